use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::config::AppConfig;
use crate::database::{open_store, DrinkStore, StoreResult};

/// Application context built once at startup and shared by every handler.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DrinkStore>,
    pub validator: Arc<TokenValidator>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DrinkStore>, validator: Arc<TokenValidator>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            validator,
        })
    }

    /// Opens the configured store and builds the token validator from `config`.
    pub async fn from_config(config: AppConfig) -> StoreResult<Arc<Self>> {
        let store = open_store(&config.database).await?;
        let validator = Arc::new(TokenValidator::from_config(&config.auth));
        Ok(Self::new(config, store, validator))
    }
}
