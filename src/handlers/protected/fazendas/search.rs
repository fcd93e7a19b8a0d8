// Search endpoints under /api/v1/fazendas. Missing or non-numeric parameters are 400.

use axum::{
    extract::rejection::QueryRejection,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::FazendaResponse;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct NomeQuery {
    pub nome: String,
}

#[derive(Debug, Deserialize)]
pub struct LocalizacaoQuery {
    pub localizacao: String,
}

#[derive(Debug, Deserialize)]
pub struct MinQuery {
    pub quantidade: i32,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub min: i32,
    pub max: i32,
}

/// GET /search/by-nome?nome= - exact, case-insensitive; 204 when nothing matches
pub async fn by_nome(
    State(state): State<AppState>,
    query: Result<Query<NomeQuery>, QueryRejection>,
) -> ApiResult<Option<FazendaResponse>> {
    let Query(q) = query?;
    Ok(ApiResponse::found(state.fazendas.find_by_nome(&q.nome).await?))
}

/// GET /search/by-localizacao?localizacao= - case-insensitive substring
pub async fn by_localizacao(
    State(state): State<AppState>,
    query: Result<Query<LocalizacaoQuery>, QueryRejection>,
) -> ApiResult<Vec<FazendaResponse>> {
    let Query(q) = query?;
    Ok(ApiResponse::success(state.fazendas.find_by_localizacao(&q.localizacao).await?))
}

pub async fn by_vacas_min(
    State(state): State<AppState>,
    query: Result<Query<MinQuery>, QueryRejection>,
) -> ApiResult<Vec<FazendaResponse>> {
    let Query(q) = query?;
    Ok(ApiResponse::success(state.fazendas.find_by_vacas_min(q.quantidade).await?))
}

/// GET /search/by-vacas-range?min=&max= - inclusive; `min > max` is an empty list
pub async fn by_vacas_range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Vec<FazendaResponse>> {
    let Query(q) = query?;
    Ok(ApiResponse::success(state.fazendas.find_by_vacas_range(q.min, q.max).await?))
}

pub async fn exists(
    State(state): State<AppState>,
    query: Result<Query<NomeQuery>, QueryRejection>,
) -> ApiResult<bool> {
    let Query(q) = query?;
    Ok(ApiResponse::success(state.fazendas.exists_by_nome(&q.nome).await?))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.fazendas.count().await?))
}
