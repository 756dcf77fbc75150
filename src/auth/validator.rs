//! JWT verification against the signing authority's key set.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::jwks::JwksClient;
use crate::auth::{AuthError, Claims};
use crate::config::AuthConfig;

/// Verifies access tokens: signature via JWKS, then `exp`, `nbf`, `iss` and `aud`.
///
/// No clock leeway is allowed.
pub struct TokenValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
}

impl TokenValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            jwks_client,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let jwks_client = JwksClient::with_ttl(
            config.jwks_url.clone(),
            Duration::from_secs(config.jwks_cache_ttl_secs),
        );
        Self::new(
            Arc::new(jwks_client),
            config.issuer.clone(),
            config.audience.clone(),
            config.algorithms.clone(),
        )
    }

    /// Validate a raw token and return its claims.
    #[instrument(skip_all)]
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Token header could not be decoded");
            AuthError::MalformedToken
        })?;
        let kid = header.kid.ok_or(AuthError::MalformedToken)?;

        if !self.algorithms.contains(&header.alg) {
            tracing::debug!(alg = ?header.alg, "Token algorithm not allowed");
            return Err(AuthError::Unparseable);
        }

        let jwk = self.jwks_client.get_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            tracing::warn!(kid = %kid, error = %e, "JWK cannot be used as a decoding key");
            AuthError::UnknownKey
        })?;

        // The key family must match every listed algorithm, so only the header's is listed.
        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;
        validation.validate_nbf = true;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            classify(e.kind())
        })?;

        tracing::debug!(sub = ?data.claims.sub, "Token validated");
        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => AuthError::Unparseable,
    }
}
