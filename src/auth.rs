//! Authentication: username/password against bcrypt hashes in the `users`
//! table, opaque session tokens in an http-only cookie validated against a
//! server-side store, and a coarse role gate for mutating reference-data
//! routes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde::Deserialize;
use serde_json::json;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::db::queries::users;
use crate::error::{AppError, AppResult};
use crate::models::user::Role;
use crate::state::{AppState, SessionUser};

/// Cookie name for the session token.
const SESSION_COOKIE: &str = "session";

/// Failed attempts allowed per username before logins are throttled.
const MAX_LOGIN_FAILURES: u32 = 5;

/// How long a throttled username stays blocked.
const LOGIN_BLOCK_WINDOW: Duration = Duration::from_secs(300);

/// Tracks consecutive login failures per username.
#[derive(Debug, Default)]
pub struct LoginRateLimiter {
    failures: Mutex<HashMap<String, (u32, Instant)>>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blocked(&self, username: &str) -> bool {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        match failures.get(username) {
            Some((count, since)) if *count >= MAX_LOGIN_FAILURES => {
                if since.elapsed() > LOGIN_BLOCK_WINDOW {
                    failures.remove(username);
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }

    pub fn record_failure(&self, username: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let entry = failures
            .entry(username.to_string())
            .or_insert((0, Instant::now()));
        entry.0 += 1;
        entry.1 = Instant::now();
    }

    pub fn reset(&self, username: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.remove(username);
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<serde_json::Value>> {
    let username = payload
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("username is required".into()))?;
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("password is required".into()))?;

    if state.login_rate_limiter.is_blocked(username) {
        return Err(AppError::RateLimited(
            "too many failed login attempts, try again later".into(),
        ));
    }

    let conn = state.db.get()?;
    let user = users::get_by_username(&conn, username)?;

    let verified = match &user {
        Some(user) => verify_password(password, &user.password_hash),
        // Burn a comparison anyway so unknown usernames cost the same.
        None => {
            let _ = verify_password(password, DUMMY_HASH);
            false
        }
    };

    let Some(user) = user.filter(|_| verified) else {
        state.login_rate_limiter.record_failure(username);
        tracing::debug!(username = %username, "Rejected login");
        return Err(AppError::Unauthorized("invalid username or password".into()));
    };

    state.login_rate_limiter.reset(username);

    let token = Uuid::new_v4().to_string();
    state
        .sessions
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(
            token.clone(),
            SessionUser {
                username: user.username.clone(),
                role: user.role,
            },
        );

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(tower_cookies::cookie::SameSite::Strict)
        .build();
    cookies.add(cookie);

    tracing::info!(username = %user.username, role = %user.role, "User logged in");

    Ok(Json(json!({
        "success": true,
        "user": { "username": user.username, "role": user.role.as_str() },
    })))
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Json<serde_json::Value> {
    if let Some(session_cookie) = cookies.get(SESSION_COOKIE) {
        state
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(session_cookie.value());
    }

    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookies.remove(cookie);

    Json(json!({ "success": true }))
}

pub async fn me(user: Option<Extension<SessionUser>>) -> AppResult<Json<serde_json::Value>> {
    let Extension(user) =
        user.ok_or_else(|| AppError::Unauthorized("authentication required".into()))?;

    Ok(Json(json!({
        "success": true,
        "user": { "username": user.username, "role": user.role.as_str() },
    })))
}

/// Middleware validating the session cookie and attaching the `SessionUser`
/// to the request. `/health` and the login route stay public.
pub async fn auth_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if path == "/health" || path == "/api/auth/login" {
        return next.run(request).await;
    }

    let session_user = cookies.get(SESSION_COOKIE).and_then(|cookie| {
        state
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(cookie.value())
            .cloned()
    });

    match session_user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => AppError::Unauthorized("authentication required".into()).into_response(),
    }
}

/// Middleware restricting a subtree to admins. Runs inside the auth
/// middleware, so the extension is present for any authenticated request.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<SessionUser>() {
        Some(user) if user.role == Role::Admin => next.run(request).await,
        Some(_) => AppError::Forbidden("admin role required".into()).into_response(),
        None => AppError::Unauthorized("authentication required".into()).into_response(),
    }
}

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("Invalid password hash in users table: {}", e);
            false
        }
    }
}

// A throwaway bcrypt hash of a random string, used to equalize timing for
// unknown usernames.
const DUMMY_HASH: &str = "$2b$12$C8qQkRnYfJZ5WyZkhA0uSeS3mDOkGvPF3PyXg9k5gG3S1o1u0y2c6";
