use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret used when JWT_SECRET is not set in development. Never valid outside development.
const DEVELOPMENT_JWT_SECRET: &str = "ceialmilk-development-secret-change-me-0123456789";

/// HS256 keys shorter than this are rejected.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// One year. Longer lifetimes are refused.
pub const MAX_JWT_EXPIRATION_SECS: u64 = 365 * 24 * 60 * 60;
/// Thirty days.
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub cache: CacheConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub bcrypt_cost: u32,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache is disabled when unset.
    pub redis_url: Option<String>,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub enable_request_logging: bool,
}

impl AppConfig {
    /// Build configuration from the process environment and validate it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup);

        config.validate()?;
        Ok(config)
    }

    fn with_overrides(mut self, lookup: &impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_EXPIRATION") {
            self.security.jwt_expiration_secs = v.parse().unwrap_or(self.security.jwt_expiration_secs);
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Cache overrides
        if let Some(v) = lookup("REDIS_URL").filter(|v| !v.trim().is_empty()) {
            self.cache.redis_url = Some(v);
        }
        if let Some(v) = lookup("CACHE_TTL_SECS") {
            self.cache.ttl_secs = v.parse().unwrap_or(self.cache.ttl_secs);
        }

        // API overrides
        if let Some(v) = lookup("API_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Some(v) = lookup("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        self
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                field: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_JWT_SECRET_BYTES),
            });
        }
        if self.environment != Environment::Development
            && self.security.jwt_secret == DEVELOPMENT_JWT_SECRET
        {
            return Err(ConfigError::Invalid {
                field: "JWT_SECRET",
                reason: "the development secret cannot be used outside development".to_string(),
            });
        }
        if !(1..=MAX_JWT_EXPIRATION_SECS).contains(&self.security.jwt_expiration_secs) {
            return Err(ConfigError::Invalid {
                field: "JWT_EXPIRATION",
                reason: format!("must be between 1 and {} seconds", MAX_JWT_EXPIRATION_SECS),
            });
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                field: "BCRYPT_COST",
                reason: format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            });
        }
        if !(1..=MAX_CACHE_TTL_SECS).contains(&self.cache.ttl_secs) {
            return Err(ConfigError::Invalid {
                field: "CACHE_TTL_SECS",
                reason: format!("must be between 1 and {} seconds", MAX_CACHE_TTL_SECS),
            });
        }
        if self.api.default_page_size == 0 || self.api.default_page_size > self.api.max_page_size {
            return Err(ConfigError::Invalid {
                field: "API_DEFAULT_PAGE_SIZE",
                reason: format!("must be between 1 and API_MAX_PAGE_SIZE ({})", self.api.max_page_size),
            });
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_expiration_secs: 3600,
                bcrypt_cost: 10,
                enable_cors: true,
                cors_origins: vec![],
            },
            cache: CacheConfig {
                redis_url: None,
                ttl_secs: 3600,
            },
            api: ApiConfig {
                default_page_size: 20,
                max_page_size: 100,
                enable_request_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiration_secs: 3600,
                bcrypt_cost: 10,
                enable_cors: true,
                cors_origins: vec![],
            },
            cache: CacheConfig {
                redis_url: None,
                ttl_secs: 3600,
            },
            api: ApiConfig {
                default_page_size: 20,
                max_page_size: 100,
                enable_request_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiration_secs: 3600,
                bcrypt_cost: 12,
                enable_cors: true,
                cors_origins: vec![],
            },
            cache: CacheConfig {
                redis_url: None,
                ttl_secs: 3600,
            },
            api: ApiConfig {
                default_page_size: 20,
                max_page_size: 100,
                enable_request_logging: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_expiration_secs, 3600);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(config.cache.redis_url.is_none());
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_production_requires_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "production")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_production_rejects_development_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "prod"),
            ("JWT_SECRET", DEVELOPMENT_JWT_SECRET),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "too-short")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_env_overrides_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "staging"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("JWT_EXPIRATION", "120"),
            ("PORT", "9090"),
            ("DATABASE_URL", "postgres://u:p@localhost/ceialmilk"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("CACHE_TTL_SECS", "60"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.security.jwt_expiration_secs, 120);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url.as_deref(), Some("postgres://u:p@localhost/ceialmilk"));
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.security.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_unparseable_override_keeps_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_EXPIRATION", "soon")])).unwrap();
        assert_eq!(config.security.jwt_expiration_secs, 3600);
    }

    #[test]
    fn test_page_sizes_must_be_consistent() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("API_DEFAULT_PAGE_SIZE", "500"),
            ("API_MAX_PAGE_SIZE", "100"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "API_DEFAULT_PAGE_SIZE", .. }));
    }

    #[test]
    fn test_lifetimes_are_bounded() {
        for value in ["0", "18446744073709551615", "10000000000000000"] {
            let err = AppConfig::from_lookup(lookup_from(&[("JWT_EXPIRATION", value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "JWT_EXPIRATION", .. }));

            let err = AppConfig::from_lookup(lookup_from(&[("CACHE_TTL_SECS", value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "CACHE_TTL_SECS", .. }));
        }

        let max = MAX_JWT_EXPIRATION_SECS.to_string();
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_EXPIRATION", max.as_str())])).unwrap();
        assert_eq!(config.security.jwt_expiration_secs, MAX_JWT_EXPIRATION_SECS);
    }
}
