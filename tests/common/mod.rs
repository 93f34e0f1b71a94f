//! Shared test utilities: a `TestClient` that drives the full router
//! (auth middleware included) against an in-memory database with the real
//! migrations applied.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use http_body_util::BodyExt;
use nexmax::auth;
use nexmax::config::Config;
use nexmax::db::queries::{daily_facts, member_report, users};
use nexmax::db::{create_in_memory_pool, migrations};
use nexmax::handlers;
use nexmax::models::member_report::{MemberReportDaily, MemberReportMonthly};
use nexmax::models::user::{NewUser, Role};
use nexmax::state::AppState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tower_cookies::CookieManagerLayer;

pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const VIEWER_PASSWORD: &str = "viewer-secret";

/// Low bcrypt cost keeps the test suite fast.
const TEST_BCRYPT_COST: u32 = 4;

/// Simulates a browser session: holds the session cookie captured at login
/// and sends it with every subsequent request.
pub struct TestClient {
    state: AppState,
    session_cookie: Option<String>,
}

impl TestClient {
    /// Fresh in-memory database with migrations applied and the two test
    /// accounts (admin/viewer) seeded. Not logged in.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");

            for (username, password, role) in [
                ("admin", ADMIN_PASSWORD, Role::Admin),
                ("viewer", VIEWER_PASSWORD, Role::Viewer),
            ] {
                let password_hash = auth::hash_password(password, TEST_BCRYPT_COST)
                    .expect("Failed to hash password");
                users::create(
                    &conn,
                    &NewUser {
                        username: username.into(),
                        password_hash,
                        role,
                    },
                )
                .expect("Failed to seed user");
            }
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7080,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            bcrypt_cost: TEST_BCRYPT_COST,
            admin_password: None,
        };

        let state = AppState {
            db: pool,
            config: Arc::new(config),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            login_rate_limiter: Arc::new(auth::LoginRateLimiter::new()),
        };

        Self {
            state,
            session_cookie: None,
        }
    }

    /// A client already logged in as the seeded admin.
    pub async fn admin() -> Self {
        let mut client = Self::new();
        let status = client.login("admin", ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed");
        client
    }

    /// A client already logged in as the seeded viewer.
    pub async fn viewer() -> Self {
        let mut client = Self::new();
        let status = client.login("viewer", VIEWER_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "viewer login failed");
        client
    }

    /// The production router shape: API routes, auth routes, auth middleware
    /// and the cookie layer.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(handlers::routes())
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/logout", post(auth::logout))
            .route("/api/auth/me", get(auth::me))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth::auth_middleware,
            ))
            .layer(CookieManagerLayer::new())
            .with_state(self.state.clone())
    }

    /// Log in and capture the session cookie for subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> StatusCode {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        if status == StatusCode::OK {
            self.session_cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .map(|v| v.to_string());
        }
        status
    }

    pub fn clear_session(&mut self) {
        self.session_cookie = None;
    }

    fn request_builder(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String, axum::http::HeaderMap) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string(), headers)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = self.request_builder("GET", uri).body(Body::empty()).unwrap();
        let (status, body, _) = self.send(request).await;
        (status, body)
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).ok())
    }

    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
        let request = self
            .request_builder("POST", uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body, _) = self.send(request).await;
        (status, body)
    }

    /// POST returning the response headers, for export attachment checks.
    pub async fn post_json_raw(
        &self,
        uri: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, String, axum::http::HeaderMap) {
        let request = self
            .request_builder("POST", uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn put_json(&self, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
        let request = self
            .request_builder("PUT", uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body, _) = self.send(request).await;
        (status, body)
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
        let request = self
            .request_builder("DELETE", uri)
            .body(Body::empty())
            .unwrap();
        let (status, body, _) = self.send(request).await;
        (status, body)
    }

    // =========================================================================
    // Seeding helpers (write through the query layer, not the API)
    // =========================================================================

    pub fn seed_monthly(
        &self,
        year: i32,
        month: u32,
        currency: &str,
        line: &str,
        deposit: f64,
        withdraw: f64,
        active: i64,
        profit: f64,
    ) {
        let conn = self.state.db.get().unwrap();
        member_report::insert_monthly(
            &conn,
            &MemberReportMonthly {
                id: 0,
                year,
                month,
                currency: currency.into(),
                line: line.into(),
                deposit_amount: deposit,
                deposit_cases: (deposit / 100.0) as i64,
                withdraw_amount: withdraw,
                withdraw_cases: (withdraw / 100.0) as i64,
                active_members: active,
                net_profit: profit,
            },
        )
        .expect("Failed to seed monthly report row");
    }

    pub fn seed_daily_report(
        &self,
        date: &str,
        currency: &str,
        line: &str,
        deposit: f64,
        withdraw: f64,
        active: i64,
        profit: f64,
    ) {
        let conn = self.state.db.get().unwrap();
        member_report::insert_daily(
            &conn,
            &MemberReportDaily {
                id: 0,
                date: date.into(),
                currency: currency.into(),
                line: line.into(),
                deposit_amount: deposit,
                deposit_cases: (deposit / 100.0) as i64,
                withdraw_amount: withdraw,
                withdraw_cases: (withdraw / 100.0) as i64,
                active_members: active,
                net_profit: profit,
            },
        )
        .expect("Failed to seed daily report row");
    }

    pub fn seed_deposit(&self, date: &str, currency: &str, line: &str, amount: f64, cases: i64) {
        let conn = self.state.db.get().unwrap();
        daily_facts::insert_deposit(&conn, date, currency, line, amount, cases)
            .expect("Failed to seed deposit");
    }

    pub fn seed_withdraw(&self, date: &str, currency: &str, line: &str, amount: f64, cases: i64) {
        let conn = self.state.db.get().unwrap();
        daily_facts::insert_withdraw(&conn, date, currency, line, amount, cases)
            .expect("Failed to seed withdrawal");
    }

    pub fn seed_new_depositor(&self, date: &str, currency: &str, line: &str, count: i64) {
        let conn = self.state.db.get().unwrap();
        daily_facts::insert_new_depositor(&conn, date, currency, line, count)
            .expect("Failed to seed new depositor count");
    }

    pub fn seed_new_register(&self, date: &str, currency: &str, line: &str, count: i64) {
        let conn = self.state.db.get().unwrap();
        daily_facts::insert_new_register(&conn, date, currency, line, count)
            .expect("Failed to seed new register count");
    }

    pub fn seed_adjustment(&self, date: &str, currency: &str, line: &str, amount: f64) {
        let conn = self.state.db.get().unwrap();
        daily_facts::insert_adjustment(&conn, date, currency, line, amount, None)
            .expect("Failed to seed adjustment");
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
