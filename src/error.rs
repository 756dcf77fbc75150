// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StoreError;

/// HTTP API error. Every variant renders as
/// `{"success": false, "error": <status>, "message": <text>}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest,

    // 401 Unauthorized
    Unauthorized,

    // 404 Not Found
    NotFound,

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 422 Unprocessable Entity (well-formed JSON with the wrong shape)
    UnprocessableEntity,

    // 500 Internal Server Error
    InternalServerError,

    // Classified token failure, carries its own status and description
    Auth(AuthError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => err.status(),
        }
    }

    /// Client-safe message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest => "bad request".to_string(),
            ApiError::Unauthorized => "unauthorized".to_string(),
            ApiError::NotFound => "resource not found".to_string(),
            ApiError::MethodNotAllowed => "method not allowed".to_string(),
            ApiError::UnprocessableEntity => "unprocessable".to_string(),
            ApiError::InternalServerError => "internal server error".to_string(),
            ApiError::Auth(err) => err.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code().as_u16(),
            "message": self.message(),
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.status().is_server_error() {
            tracing::error!(code = err.code(), "Token verification unavailable");
        } else {
            tracing::debug!(code = err.code(), "Request rejected: {}", err);
        }
        ApiError::Auth(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::DuplicateTitle(_) => ApiError::UnprocessableEntity,
            StoreError::Serialization(e) => {
                // Log the real error but return generic message
                tracing::error!("Recipe serialization error: {}", e);
                ApiError::InternalServerError
            }
            StoreError::Database(e) => {
                tracing::error!("SQLx error: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::UnprocessableEntity,
            other => {
                tracing::debug!("Rejected request body: {}", other.body_text());
                ApiError::BadRequest
            }
        }
    }
}

// A non-integer id means the route does not exist for that path.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
