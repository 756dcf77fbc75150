//! PostgreSQL drink store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::database::models::{seed_drink, Drink, DrinkPatch, NewDrink};
use crate::database::store::{DrinkStore, StoreError, StoreResult};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS drink (
    id     SERIAL PRIMARY KEY,
    title  VARCHAR(80) NOT NULL UNIQUE,
    recipe TEXT        NOT NULL
)"#;

pub struct PgDrinkStore {
    pool: PgPool,
}

impl PgDrinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the drink table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps unique violations on `title` to a typed error.
fn classify(err: sqlx::Error, title: Option<&str>) -> StoreError {
    if let (sqlx::Error::Database(db), Some(title)) = (&err, title) {
        if db.is_unique_violation() {
            warn!(title = %title, "duplicate drink title");
            return StoreError::DuplicateTitle(title.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl DrinkStore for PgDrinkStore {
    async fn list(&self) -> StoreResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> StoreResult<Drink> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drink WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, drink: NewDrink) -> StoreResult<Drink> {
        sqlx::query_as::<_, Drink>(
            "INSERT INTO drink (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(&drink.title)
        .bind(&drink.recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Some(drink.title.as_str())))
    }

    async fn update(&self, id: i32, patch: DrinkPatch) -> StoreResult<Drink> {
        sqlx::query_as::<_, Drink>(
            "UPDATE drink SET title = COALESCE($2, title), recipe = COALESCE($3, recipe) \
             WHERE id = $1 RETURNING id, title, recipe",
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.recipe.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, patch.title.as_deref()))?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> StoreResult<i32> {
        let deleted: Option<i32> = sqlx::query_scalar("DELETE FROM drink WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        deleted.ok_or(StoreError::NotFound(id))
    }

    async fn reset(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS drink").execute(&mut *tx).await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;

        let seed = seed_drink();
        sqlx::query("INSERT INTO drink (title, recipe) VALUES ($1, $2)")
            .bind(&seed.title)
            .bind(&seed.recipe)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Reset drink table with seed data");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
