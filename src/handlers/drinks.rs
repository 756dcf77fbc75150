use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::Claims;
use crate::database::models::{
    Drink, DrinkLong, DrinkPatch, DrinkShort, Ingredient, NewDrink, MAX_TITLE_CHARS,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Request body for create and update; which fields are mandatory depends on the route.
#[derive(Debug, Default, Deserialize)]
pub struct DrinkBody {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::UnprocessableEntity);
    }
    Ok(())
}

fn shorts(drinks: &[Drink]) -> Result<Vec<DrinkShort>, ApiError> {
    Ok(drinks.iter().map(Drink::short).collect::<Result<_, _>>()?)
}

fn longs(drinks: &[Drink]) -> Result<Vec<DrinkLong>, ApiError> {
    Ok(drinks.iter().map(Drink::long).collect::<Result<_, _>>()?)
}

/// GET /drinks - public menu, short projection
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<DrinkShort>> {
    let drinks = state.store.list().await?;
    Ok(ApiResponse::success("drinks", shorts(&drinks)?))
}

/// GET /drinks-detail - full recipes
pub async fn list_detail(State(state): State<Arc<AppState>>) -> ApiResult<Vec<DrinkLong>> {
    let drinks = state.store.list().await?;
    Ok(ApiResponse::success("drinks", longs(&drinks)?))
}

/// POST /drinks - both title and recipe are required
pub async fn create(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    body: Result<Json<DrinkBody>, JsonRejection>,
) -> ApiResult<DrinkLong> {
    let Json(body) = body?;
    let (title, recipe) = match (body.title, body.recipe) {
        (Some(title), Some(recipe)) => (title, recipe),
        _ => return Err(ApiError::BadRequest),
    };
    check_title(&title)?;

    let drink = state.store.insert(NewDrink::new(title, &recipe)?).await?;
    info!(id = drink.id, sub = ?claims.sub, "Drink created");

    Ok(ApiResponse::success("drinks", drink.long()?))
}

/// PATCH /drinks/:id - only the supplied fields change
pub async fn update(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<DrinkBody>, JsonRejection>,
) -> ApiResult<DrinkShort> {
    let Path(id) = id?;
    let existing = state.store.get(id).await?;

    let Json(body) = body?;
    if let Some(title) = &body.title {
        check_title(title)?;
    }

    let patch = DrinkPatch::new(body.title, body.recipe.as_deref())?;
    let drink = if patch.is_empty() {
        existing
    } else {
        state.store.update(id, patch).await?
    };
    info!(id, sub = ?claims.sub, "Drink updated");

    Ok(ApiResponse::success("drinks", drink.short()?))
}

/// DELETE /drinks/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<i32> {
    let Path(id) = id?;
    let deleted = state.store.delete(id).await?;
    info!(id = deleted, sub = ?claims.sub, "Drink deleted");

    Ok(ApiResponse::success("delete", deleted))
}
