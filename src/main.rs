use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use nexmax::auth;
use nexmax::config::Config;
use nexmax::db::queries::users;
use nexmax::db::{create_pool, migrations};
use nexmax::handlers;
use nexmax::models::user::{NewUser, Role};
use nexmax::state::AppState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexmax=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting NEXMAX dashboard backend v{} on {}",
        nexmax::VERSION,
        config.address()
    );

    let db = create_pool(&config.database_path).expect("Failed to create database pool");

    {
        let conn = db.get().expect("Failed to get database connection");
        migrations::run_migrations(&conn, &config.migrations_path)
            .expect("Failed to run migrations");

        bootstrap_admin(&conn, &config);
    }

    let state = AppState {
        db,
        config: Arc::new(config.clone()),
        sessions: Arc::new(Mutex::new(HashMap::new())),
        login_rate_limiter: Arc::new(auth::LoginRateLimiter::new()),
    };

    let app = Router::new()
        .merge(handlers::routes())
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(CookieManagerLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.address())
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", config.address());

    axum::serve(listener, app).await.expect("Server error");
}

/// Create the initial admin account when the users table is empty and a
/// bootstrap password is configured. Without it a fresh database has no way
/// to log in.
fn bootstrap_admin(conn: &rusqlite::Connection, config: &Config) {
    let user_count = users::count(conn).expect("Failed to count users");
    if user_count > 0 {
        return;
    }

    match &config.admin_password {
        Some(password) => {
            let password_hash = auth::hash_password(password, config.bcrypt_cost)
                .expect("Failed to hash admin password");
            users::create(
                conn,
                &NewUser {
                    username: "admin".into(),
                    password_hash,
                    role: Role::Admin,
                },
            )
            .expect("Failed to create admin user");
            tracing::info!("Created bootstrap admin user");
        }
        None => {
            tracing::warn!(
                "No users exist and NEXMAX_ADMIN_PASSWORD is not set; logins will fail"
            );
        }
    }
}
