use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthError, TokenService};
use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::database::{FazendaRepository, UsuarioRepository};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, FazendaService};

/// Shared state handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub fazendas: Arc<FazendaService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        fazendas: Arc<dyn FazendaRepository>,
        usuarios: Arc<dyn UsuarioRepository>,
        cache: Option<Arc<dyn ResponseCache>>,
    ) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::from_config(&config.security)?);
        let auth = Arc::new(AuthService::new(usuarios, tokens.clone()));
        let fazendas = Arc::new(FazendaService::new(fazendas, cache, &config));

        Ok(Self {
            config: Arc::new(config),
            tokens,
            auth,
            fazendas,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(fazenda_routes())
        .merge(env_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected);

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/validate", post(auth::validate_post))
}

fn fazenda_routes() -> Router<AppState> {
    use protected::fazendas;

    Router::new()
        // Collection
        .route("/api/v1/fazendas", get(fazendas::schema_get).post(fazendas::schema_post))
        // Aggregates and searches
        .route("/api/v1/fazendas/count", get(fazendas::count))
        .route("/api/v1/fazendas/exists", get(fazendas::exists))
        .route("/api/v1/fazendas/search/by-nome", get(fazendas::by_nome))
        .route("/api/v1/fazendas/search/by-localizacao", get(fazendas::by_localizacao))
        .route("/api/v1/fazendas/search/by-vacas-min", get(fazendas::by_vacas_min))
        .route("/api/v1/fazendas/search/by-vacas-range", get(fazendas::by_vacas_range))
        // Record
        .route(
            "/api/v1/fazendas/:id",
            get(fazendas::record_get)
                .put(fazendas::record_put)
                .delete(fazendas::record_delete),
        )
}

fn env_routes() -> Router<AppState> {
    Router::new().route("/api/v1/env/check", get(protected::env_check))
}

/// Permissive in development unless origins are listed; otherwise only the listed origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if origins.is_empty() && config.is_development() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::database::{InMemoryFazendaRepository, InMemoryUsuarioRepository};

    fn state() -> AppState {
        AppState::new(
            AppConfig::development(),
            Arc::new(InMemoryFazendaRepository::new()),
            Arc::new(InMemoryUsuarioRepository::new()),
            None,
        )
        .unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn protected_route_needs_token() {
        let response = app(state())
            .oneshot(get_request("/api/v1/fazendas/count", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn fixed_paths_take_priority_over_id() {
        let state = state();
        let token = state.tokens.generate_token("a@b.com", &["ROLE_USER".to_string()]).unwrap();

        let response = app(state.clone())
            .oneshot(get_request("/api/v1/fazendas/count", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(state)
            .oneshot(get_request("/api/v1/fazendas/1", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app(state()).oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
