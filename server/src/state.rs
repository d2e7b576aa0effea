use std::sync::Arc;

use jobportal::config::Config;
use jobportal::{
    default_database_path, ConfigError, Database, Lifecycle, LifecycleBroadcaster, LifecycleError,
    PortalError, TokenStore,
};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<Lifecycle>,
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    pub fn new(lifecycle: Lifecycle, tokens: TokenStore) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
            tokens: Arc::new(tokens),
        }
    }

    /// Opens the configured database and wires the lifecycle and token store to it.
    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        let path = match &config.database.path {
            Some(path) => path.clone(),
            None => default_database_path().ok_or_else(|| ConfigError::Validation {
                message: "database.path is unset and no home directory was found".to_string(),
            })?,
        };
        let db = Database::open(&path)?;

        let lifecycle = Lifecycle::new(
            db.clone(),
            LifecycleBroadcaster::default(),
            config.scheduling_offset()?,
        );
        let tokens = TokenStore::new(db, config.token_ttl());
        Ok(Self::new(lifecycle, tokens))
    }

    /// Runs a synchronous lifecycle operation off the async executor.
    pub async fn run<F, T>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Lifecycle) -> Result<T, LifecycleError> + Send + 'static,
        T: Send + 'static,
    {
        let lifecycle = Arc::clone(&self.lifecycle);
        let result = tokio::task::spawn_blocking(move || op(&lifecycle)).await?;
        Ok(result?)
    }
}
