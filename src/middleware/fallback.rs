use axum::{
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Router fallback for paths with no route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Replaces axum's empty 405 with the JSON envelope, keeping the `Allow` header.
pub async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut rewritten = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(ALLOW, allow);
    }
    rewritten
}
