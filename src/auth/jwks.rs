//! JWKS client for fetching and caching the signing authority's public keys.
//!
//! Keys are fetched from the authority's `/.well-known/jwks.json` endpoint and
//! cached for a configurable TTL. An expired cache is refreshed on the next
//! lookup so key rotations are picked up.

use jsonwebtoken::jwk::{Jwk, JwkSet};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::auth::AuthError;

/// Default cache TTL in seconds (5 minutes).
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Timeout for a single JWKS request.
const FETCH_TIMEOUT_SECONDS: u64 = 10;

struct CachedJwks {
    /// Map of key ID to JWK.
    keys: HashMap<String, Jwk>,
    expires_at: Instant,
}

/// Thread-safe JWKS client shared by every request through the validator.
pub struct JwksClient {
    jwks_url: String,
    http_client: reqwest::Client,
    cache: Arc<RwLock<Option<CachedJwks>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: String) -> Self {
        Self::with_ttl(jwks_url, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    pub fn with_ttl(jwks_url: String, cache_ttl: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "drinks_api::auth::jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url,
            http_client,
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    /// Get a JWK by key ID, fetching the key set when the cache is empty or stale.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownKey` if the key set has no key with `kid`,
    /// and `AuthError::KeySetUnavailable` if the key set cannot be fetched.
    #[instrument(skip(self), fields(kid = %kid))]
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    tracing::debug!(target: "drinks_api::auth::jwks", "JWKS cache hit");
                    return cached.keys.get(kid).cloned().ok_or(AuthError::UnknownKey);
                }
            }
        }

        self.refresh_cache().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| {
                tracing::warn!(target: "drinks_api::auth::jwks", kid = %kid, "Key not found in JWKS after refresh");
                AuthError::UnknownKey
            })
    }

    #[instrument(skip(self))]
    async fn refresh_cache(&self) -> Result<(), AuthError> {
        tracing::debug!(target: "drinks_api::auth::jwks", url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "drinks_api::auth::jwks", error = %e, "Failed to fetch JWKS");
                AuthError::KeySetUnavailable
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "drinks_api::auth::jwks",
                status = %response.status(),
                "JWKS endpoint returned error"
            );
            return Err(AuthError::KeySetUnavailable);
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(target: "drinks_api::auth::jwks", error = %e, "Failed to parse JWKS response");
            AuthError::KeySetUnavailable
        })?;

        // Keys without a kid can never be selected by a token header.
        let keys: HashMap<String, Jwk> = jwks
            .keys
            .into_iter()
            .filter_map(|key| key.common.key_id.clone().map(|kid| (kid, key)))
            .collect();

        tracing::info!(target: "drinks_api::auth::jwks", key_count = keys.len(), "JWKS cache refreshed");

        let mut cache = self.cache.write().await;
        *cache = Some(CachedJwks {
            keys,
            expires_at: Instant::now() + self.cache_ttl,
        });

        Ok(())
    }
}
