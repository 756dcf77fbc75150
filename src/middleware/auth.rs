use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{check_permission, AuthError, Claims, TokenValidator};
use crate::error::ApiError;

/// Per-route authentication state: the shared validator plus the permission
/// the route requires. `None` still demands a present, valid token.
#[derive(Clone)]
pub struct AuthGate {
    pub validator: Arc<TokenValidator>,
    pub permission: Option<&'static str>,
}

impl AuthGate {
    pub fn new(validator: Arc<TokenValidator>, permission: Option<&'static str>) -> Self {
        Self { validator, permission }
    }
}

/// Authentication middleware: validates the bearer token, checks the gate's
/// permission, then stores the claims in request extensions for handlers.
#[instrument(skip_all, name = "drinks_api.middleware.auth")]
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;
    let claims = gate.validator.validate(&token).await?;

    if let Some(permission) = gate.permission {
        check_permission(permission, &claims)?;
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extract the token from exactly one `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let mut values = headers.get_all(AUTHORIZATION).iter();
    let value = values.next().ok_or(AuthError::HeaderMissing)?;
    if values.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let parts: Vec<&str> = value.split_whitespace().collect();

    match parts.as_slice() {
        [] => Err(AuthError::HeaderMissing),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::NotBearer),
        [_] => Err(AuthError::TokenMissing),
        [_, token] => Ok((*token).to_string()),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Handlers behind `require_auth` can take the decoded claims as an argument.
#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Claims>().cloned().ok_or_else(|| {
            tracing::error!("Claims requested on a route without an auth gate");
            ApiError::Unauthorized
        })
    }
}
