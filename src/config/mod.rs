use jsonwebtoken::Algorithm;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub reset_on_start: bool,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub issuer: String,
    pub jwks_url: String,
    pub algorithms: Vec<Algorithm>,
    pub jwks_cache_ttl_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let environment = match vars.get("APP_ENV").map(String::as_str) {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let domain = required(vars, "AUTH0_DOMAIN")?;
        let audience = required(vars, "API_AUDIENCE")?;

        let mut config = Self::preset(environment, domain, audience)?;
        config.apply_overrides(vars)?;
        Ok(config)
    }

    fn preset(environment: Environment, domain: String, audience: String) -> Result<Self, ConfigError> {
        let authority = authority_url(&domain)?;
        let issuer = authority.to_string();
        let jwks_url = authority
            .join(".well-known/jwks.json")
            .map_err(|_| ConfigError::Invalid { name: "AUTH0_DOMAIN", value: domain.clone() })?
            .to_string();

        let (max_connections, connection_timeout, jwks_cache_ttl_secs, cors_origins) = match environment {
            Environment::Development => (5, 30, 60, Vec::new()),
            Environment::Staging => (10, 10, 300, vec!["https://staging.example.com".to_string()]),
            Environment::Production => (20, 5, 600, vec!["https://app.example.com".to_string()]),
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections,
                connection_timeout,
                reset_on_start: false,
            },
            auth: AuthConfig {
                domain,
                audience,
                issuer,
                jwks_url,
                algorithms: vec![Algorithm::RS256],
                jwks_cache_ttl_secs,
            },
            security: SecurityConfig { cors_origins },
        })
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        // Server overrides
        if let Some(v) = vars.get("BIND_ADDRESS") {
            self.server.bind_address = v.clone();
        }
        if let Some(v) = vars.get("PORT") {
            self.server.port = parse_var("PORT", v)?;
        }

        // Database overrides
        if let Some(v) = vars.get("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(v.clone());
        }
        if let Some(v) = vars.get("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = vars.get("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        if let Some(v) = vars.get("DATABASE_RESET_ON_START") {
            self.database.reset_on_start = parse_var("DATABASE_RESET_ON_START", v)?;
        }

        // Auth overrides
        if let Some(v) = vars.get("AUTH0_ISSUER") {
            self.auth.issuer = v.clone();
        }
        if let Some(v) = vars.get("AUTH0_JWKS_URL") {
            Url::parse(v).map_err(|_| ConfigError::Invalid { name: "AUTH0_JWKS_URL", value: v.clone() })?;
            self.auth.jwks_url = v.clone();
        }
        if let Some(v) = vars.get("AUTH0_ALGORITHMS") {
            self.auth.algorithms = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_var("AUTH0_ALGORITHMS", s))
                .collect::<Result<_, _>>()?;
            if self.auth.algorithms.is_empty() {
                return Err(ConfigError::Invalid { name: "AUTH0_ALGORITHMS", value: v.clone() });
            }
        }
        if let Some(v) = vars.get("JWKS_CACHE_TTL_SECS") {
            self.auth.jwks_cache_ttl_secs = parse_var("JWKS_CACHE_TTL_SECS", v)?;
        }

        // Security overrides
        if let Some(v) = vars.get("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && s != "*")
                .collect();
        }

        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

fn required(vars: &HashMap<String, String>, name: &'static str) -> Result<String, ConfigError> {
    vars.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

/// Auth0 domains are configured bare (`tenant.auth0.com`); a scheme is accepted too.
fn authority_url(domain: &str) -> Result<Url, ConfigError> {
    let raw = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    };
    let mut url = Url::parse(&raw).map_err(|_| ConfigError::Invalid {
        name: "AUTH0_DOMAIN",
        value: domain.to_string(),
    })?;
    url.set_path("/");
    Ok(url)
}
