use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryDrinkStore;
use crate::database::postgres::PgDrinkStore;
use crate::database::store::{DrinkStore, StoreResult};

/// Opens the drink store described by `config`.
///
/// With a `DATABASE_URL` this connects a PostgreSQL pool and makes sure the
/// table exists; without one the process keeps drinks in memory. When
/// `reset_on_start` is set the table is dropped and reseeded either way.
pub async fn open_store(config: &DatabaseConfig) -> StoreResult<Arc<dyn DrinkStore>> {
    let store: Arc<dyn DrinkStore> = match &config.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.connection_timeout))
                .connect(url)
                .await?;
            info!(max_connections = config.max_connections, "Connected database pool");

            let store = PgDrinkStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, drinks are kept in memory");
            Arc::new(MemoryDrinkStore::new())
        }
    };

    if config.reset_on_start {
        warn!("Resetting drink table, all existing records are dropped");
        store.reset().await?;
    }

    Ok(store)
}
