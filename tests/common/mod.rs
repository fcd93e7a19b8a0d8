#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use ceialmilk_api::auth::password::hash_password;
use ceialmilk_api::cache::{InMemoryCache, ResponseCache};
use ceialmilk_api::config::AppConfig;
use ceialmilk_api::database::{InMemoryFazendaRepository, InMemoryUsuarioRepository, NewUsuario, UsuarioRepository};
use ceialmilk_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@ceialmilk.com";
pub const ADMIN_PASSWORD: &str = "password";
pub const DISABLED_EMAIL: &str = "inativo@ceialmilk.com";

/// In-process server backed by in-memory repositories and cache
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    pub cache: Arc<InMemoryCache>,
    pub fazendas: Arc<InMemoryFazendaRepository>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in as the seeded admin and return the bearer token
    pub async fn admin_token(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed with {}", res.status());

        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response had no token")
    }

    /// POST a farm as admin and return the `data` object
    pub async fn create_fazenda(&self, token: &str, payload: Value) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/v1/fazendas"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed with {}", res.status());
        let body: Value = res.json().await?;
        Ok(body["data"].clone())
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

async fn seed_users(usuarios: &InMemoryUsuarioRepository) -> Result<()> {
    for (email, perfil, enabled) in [(ADMIN_EMAIL, "ADMIN", true), (DISABLED_EMAIL, "USER", false)] {
        usuarios
            .insert(NewUsuario {
                nome: "Teste".to_string(),
                email: email.to_string(),
                senha: hash_password(ADMIN_PASSWORD, 4)?,
                perfil: perfil.to_string(),
                enabled,
            })
            .await?;
    }
    Ok(())
}

/// Start a fresh server on an unused port; it lives as long as the test's runtime
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let usuarios = Arc::new(InMemoryUsuarioRepository::new());
    seed_users(&usuarios).await?;
    let fazendas = Arc::new(InMemoryFazendaRepository::new());
    let cache = Arc::new(InMemoryCache::new());

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;

    let state = AppState::new(
        config,
        fazendas.clone(),
        usuarios,
        Some(cache.clone() as Arc<dyn ResponseCache>),
    )?;

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let server = TestServer {
        port,
        base_url,
        client: reqwest::Client::new(),
        cache,
        fazendas,
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}
