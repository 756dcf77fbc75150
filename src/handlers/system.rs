use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET / - service identity and route overview
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Drinks API",
            "version": version,
            "endpoints": {
                "menu": "GET /drinks (public)",
                "detail": "GET /drinks-detail (get:drinks-detail)",
                "create": "POST /drinks (post:drinks)",
                "update": "PATCH /drinks/:id (patch:drinks)",
                "delete": "DELETE /drinks/:id (delete:drinks)",
            }
        }
    }))
}

/// GET /health - liveness plus a store round-trip
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": 503,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
