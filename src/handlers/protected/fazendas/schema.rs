// Collection-level operations: GET/POST /api/v1/fazendas

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Extension, Json,
};

use crate::api::{FazendaCreateRequest, FazendaResponse, Page, PageRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/v1/fazendas?page=&size= - farms ordered by id
pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> ApiResult<Page<FazendaResponse>> {
    let Query(request) = query?;
    let page = state.fazendas.list(request).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/v1/fazendas - create a farm, 201 on success
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<FazendaCreateRequest>, JsonRejection>,
) -> ApiResult<FazendaResponse> {
    let Json(request) = payload?;
    tracing::debug!(user = %user.username, nome = %request.nome, "Creating fazenda");

    let created = state.fazendas.create(request).await?;
    Ok(ApiResponse::created(created))
}
