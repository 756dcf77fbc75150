#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drinks_api::auth::TokenValidator;
use drinks_api::config::AppConfig;
use drinks_api::database::MemoryDrinkStore;
use drinks_api::AppState;

pub const DOMAIN: &str = "coffee.test.auth0.com";
pub const ISSUER: &str = "https://coffee.test.auth0.com/";
pub const AUDIENCE: &str = "drinks";
pub const KID: &str = "test-key-01";

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &["get:drinks-detail", "post:drinks", "patch:drinks", "delete:drinks"];

static SIGNING_KEY: Lazy<EncodingKey> = Lazy::new(|| {
    EncodingKey::from_rsa_pem(include_bytes!("../fixtures/test_rsa_key.pem")).expect("fixture signing key")
});

static FORGED_KEY: Lazy<EncodingKey> = Lazy::new(|| {
    EncodingKey::from_rsa_pem(include_bytes!("../fixtures/forged_rsa_key.pem")).expect("fixture forged key")
});

/// In-process application wired to an in-memory store and a mocked JWKS endpoint.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDrinkStore>,
    pub jwks: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let jwks = MockServer::start().await;
        let key_set: Value = serde_json::from_str(include_str!("../fixtures/test_jwks.json"))
            .context("fixture JWKS is not JSON")?;

        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&key_set))
            .mount(&jwks)
            .await;

        let vars = HashMap::from([
            ("AUTH0_DOMAIN".to_string(), DOMAIN.to_string()),
            ("API_AUDIENCE".to_string(), AUDIENCE.to_string()),
            (
                "AUTH0_JWKS_URL".to_string(),
                format!("{}/.well-known/jwks.json", jwks.uri()),
            ),
        ]);
        let config = AppConfig::from_vars(&vars).context("test configuration")?;

        let store = Arc::new(MemoryDrinkStore::new());
        let validator = Arc::new(TokenValidator::from_config(&config.auth));
        let state = AppState::new(config, store.clone(), validator);

        Ok(Self {
            router: drinks_api::app(state),
            store,
            jwks,
        })
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, token, None).await
    }

    /// Creates a drink through the API with a manager token and returns its id.
    pub async fn create_drink(&self, title: &str, recipe: Value) -> Result<i64> {
        let token = token(MANAGER);
        let (status, body) = self
            .send(
                Method::POST,
                "/drinks",
                Some(&token),
                Some(json!({"title": title, "recipe": recipe})),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create failed: {} {}", status, body);
        body["drinks"]["id"].as_i64().context("created drink has no id")
    }
}

pub fn claims(permissions: Option<&[&str]>) -> Value {
    let now = Utc::now().timestamp();
    let mut claims = json!({
        "iss": ISSUER,
        "sub": "auth0|test-user",
        "aud": [AUDIENCE, format!("{}userinfo", ISSUER)],
        "iat": now,
        "exp": now + 3600,
    });
    if let Some(permissions) = permissions {
        claims["permissions"] = json!(permissions);
    }
    claims
}

pub fn sign(claims: &Value, key: &EncodingKey, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    header.kid = Some(kid.to_string());
    encode(&header, claims, key).expect("Failed to sign token")
}

/// A valid token granting `permissions`.
pub fn token(permissions: &[&str]) -> String {
    sign(&claims(Some(permissions)), &SIGNING_KEY, KID)
}

pub fn token_with_claims(claims: &Value) -> String {
    sign(claims, &SIGNING_KEY, KID)
}

pub fn expired_token(permissions: &[&str]) -> String {
    let mut claims = claims(Some(permissions));
    let past = Utc::now().timestamp() - 7200;
    claims["iat"] = json!(past - 3600);
    claims["exp"] = json!(past);
    token_with_claims(&claims)
}

/// Same kid as the published key, signed with a different private key.
pub fn forged_token(permissions: &[&str]) -> String {
    sign(&claims(Some(permissions)), &FORGED_KEY, KID)
}
