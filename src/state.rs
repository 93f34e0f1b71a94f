use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::auth::LoginRateLimiter;
use crate::config::Config;
use crate::db::DbPool;
use crate::models::user::Role;

/// The authenticated principal attached to a request by the auth middleware.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
}

/// Server-side session store mapping opaque tokens to their users.
pub type SessionStore = Arc<Mutex<HashMap<String, SessionUser>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub login_rate_limiter: Arc<LoginRateLimiter>,
}
