use crate::config::Config;
use crate::leetcode::LeetCodeClient;
use axum::extract::FromRef;
use sqlx::PgPool;

/// Shared application state. Constructed once at startup and handed to the
/// router; handlers pull out the piece they need via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub leetcode: LeetCodeClient,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for LeetCodeClient {
    fn from_ref(state: &AppState) -> Self {
        state.leetcode.clone()
    }
}
