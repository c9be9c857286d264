//! Shared application state.

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use dukaan_db::Database;

/// State shared by every handler via `Router::with_state`.
///
/// Cloning is cheap: the database handle wraps a pool and the JWT manager
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Builds state from a connected database and loaded configuration.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_lifetime_secs,
        ));

        AppState { db, config, jwt }
    }
}
