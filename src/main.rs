use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ceialmilk_api::app::{app, shutdown_signal, AppState};
use ceialmilk_api::cache::{RedisCache, ResponseCache};
use ceialmilk_api::config::AppConfig;
use ceialmilk_api::database::{DatabaseManager, PgFazendaRepository, PgUsuarioRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ceialmilk_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting CeialMilk API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;

    let cache: Option<Arc<dyn ResponseCache>> = match config.cache.redis_url.as_deref() {
        Some(url) => {
            let redis = RedisCache::connect(url).await.context("failed to connect to Redis")?;
            Some(Arc::new(redis))
        }
        None => {
            tracing::info!("REDIS_URL not set, response cache disabled");
            None
        }
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(
        config,
        Arc::new(PgFazendaRepository::new(pool.clone())),
        Arc::new(PgUsuarioRepository::new(pool.clone())),
        cache,
    )?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("CeialMilk API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
