//! In-memory drink store.
//!
//! Rows live in a `BTreeMap` keyed by id, so iteration order matches
//! insertion order as long as ids come from the internal sequence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::models::{seed_drink, Drink, DrinkPatch, NewDrink};
use crate::database::store::{DrinkStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Drink>,
    last_id: i32,
}

impl Table {
    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDrinkStore {
    table: RwLock<Table>,
}

impl MemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkStore for MemoryDrinkStore {
    async fn list(&self) -> StoreResult<Vec<Drink>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Drink> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink> {
        let mut table = self.table.write().await;
        if table.title_taken(&drink.title, None) {
            return Err(StoreError::DuplicateTitle(drink.title));
        }

        table.last_id += 1;
        let row = Drink {
            id: table.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        table.rows.insert(row.id, row.clone());
        debug!(id = row.id, "inserted drink");
        Ok(row)
    }

    async fn update(&self, id: i32, patch: DrinkPatch) -> StoreResult<Drink> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(title) = &patch.title {
            if table.title_taken(title, Some(id)) {
                return Err(StoreError::DuplicateTitle(title.clone()));
            }
        }

        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<i32> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|d| d.id)
            .ok_or(StoreError::NotFound(id))
    }

    async fn reset(&self) -> StoreResult<()> {
        {
            let mut table = self.table.write().await;
            *table = Table::default();
        }
        self.insert(seed_drink()).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
