// handlers/public/status.rs - service info and health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "CeialMilk API",
            "version": version,
            "description": "Dairy farm management backend",
            "environment": state.config.environment,
            "cache": state.fazendas.cache_enabled(),
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login, /api/auth/validate (public)",
                "fazendas": "/api/v1/fazendas[/:id] (protected)",
                "search": "/api/v1/fazendas/search/* (protected)",
                "env": "/api/v1/env/check (protected)",
            }
        }
    }))
}

/// GET /health - database and cache liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let report = state.fazendas.health().await;

    if report.is_healthy() {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": report.database,
                    "cache": report.cache
                }
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "dependency unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database": report.database,
                    "cache": report.cache
                }
            })),
        )
    }
}
