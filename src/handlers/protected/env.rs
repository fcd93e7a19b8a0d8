// handlers/protected/env.rs - GET /api/v1/env/check
//
// Configuration diagnostics for operators. Credentials are masked and secrets
// are reported only as present or absent.

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::config::{AppConfig, Environment};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvReport {
    pub environment: Environment,
    pub database_url_present: bool,
    pub database_url_scheme: Option<String>,
    pub database_url_masked: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret_present: bool,
    pub jwt_expiration_secs: u64,
    pub cache_enabled: bool,
    pub cache_url_masked: Option<String>,
    pub cache_ttl_secs: u64,
    pub cors_origins: Vec<String>,
}

impl EnvReport {
    pub fn from_config(config: &AppConfig) -> Self {
        let database_url = config.database.url.as_deref();
        Self {
            environment: config.environment,
            database_url_present: database_url.is_some(),
            database_url_scheme: database_url
                .and_then(|u| url::Url::parse(u).ok())
                .map(|u| u.scheme().to_string()),
            database_url_masked: database_url.map(DatabaseManager::mask_credentials),
            database_max_connections: config.database.max_connections,
            jwt_secret_present: !config.security.jwt_secret.is_empty(),
            jwt_expiration_secs: config.security.jwt_expiration_secs,
            cache_enabled: config.cache.redis_url.is_some(),
            cache_url_masked: config.cache.redis_url.as_deref().map(DatabaseManager::mask_credentials),
            cache_ttl_secs: config.cache.ttl_secs,
            cors_origins: config.security.cors_origins.clone(),
        }
    }
}

pub async fn env_check(State(state): State<AppState>) -> ApiResult<EnvReport> {
    Ok(ApiResponse::success(EnvReport::from_config(&state.config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_masks_credentials() {
        let mut config = AppConfig::development();
        config.database.url = Some("postgres://farm:s3cret@db:5432/ceialmilk".to_string());
        config.cache.redis_url = Some("redis://:hunter2@cache:6379".to_string());

        let report = EnvReport::from_config(&config);
        let json = serde_json::to_string(&report).unwrap();

        assert!(report.database_url_present);
        assert_eq!(report.database_url_scheme.as_deref(), Some("postgres"));
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains(&config.security.jwt_secret));
        assert!(report.jwt_secret_present);
    }

    #[test]
    fn report_without_database_url() {
        let report = EnvReport::from_config(&AppConfig::development());
        assert!(!report.database_url_present);
        assert!(report.database_url_masked.is_none());
        assert!(!report.cache_enabled);
    }
}
