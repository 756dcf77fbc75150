//! Bearer-token authentication against an Auth0-style signing authority.

pub mod jwks;
pub mod validator;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use jwks::JwksClient;
pub use validator::TokenValidator;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Decoded access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// A single audience string or a list of them.
    pub aud: Value,
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Classified authentication failure.
///
/// The display text is the description sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("Authorization header must start with \"Bearer\".")]
    NotBearer,

    #[error("Token not found.")]
    TokenMissing,

    #[error("Authorization header must be bearer token.")]
    MalformedHeader,

    #[error("Authorization malformed.")]
    MalformedToken,

    #[error("Unable to find the appropriate key.")]
    UnknownKey,

    #[error("Unable to parse authentication token.")]
    Unparseable,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionDenied,

    #[error("Unable to verify authentication token.")]
    KeySetUnavailable,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::NotBearer
            | AuthError::TokenMissing
            | AuthError::MalformedHeader
            | AuthError::MalformedToken
            | AuthError::UnknownKey
            | AuthError::Unparseable => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing | AuthError::PermissionDenied => {
                "invalid_claims"
            }
            AuthError::KeySetUnavailable => "jwks_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::KeySetUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Checks that `claims` grant `permission`.
pub fn check_permission(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims.permissions.as_ref().ok_or(AuthError::PermissionsMissing)?;
    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}
