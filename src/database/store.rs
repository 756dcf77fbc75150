//! Storage interface for drinks.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Drink, DrinkPatch, NewDrink};

/// Errors from a drink store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink {0} not found")]
    NotFound(i32),

    #[error("a drink titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("recipe serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract storage for the drinks table.
///
/// Implementations must be thread-safe; handlers share one instance
/// through the application state.
#[async_trait]
pub trait DrinkStore: Send + Sync + 'static {
    /// All drinks in insertion order.
    async fn list(&self) -> StoreResult<Vec<Drink>>;

    async fn get(&self, id: i32) -> StoreResult<Drink>;

    /// Inserts a row and returns it with its generated id.
    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink>;

    /// Applies the present fields of `patch` to an existing row.
    async fn update(&self, id: i32, patch: DrinkPatch) -> StoreResult<Drink>;

    /// Removes a row and returns its id.
    async fn delete(&self, id: i32) -> StoreResult<i32>;

    /// Drops and recreates the table, then inserts the seed drink.
    async fn reset(&self) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
}
