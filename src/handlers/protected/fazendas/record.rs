// Record-level operations: GET/PUT/DELETE /api/v1/fazendas/:id
//
// A missing farm answers 204 with no body, never 404.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};

use crate::api::{FazendaResponse, FazendaUpdateRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Option<FazendaResponse>> {
    let Path(id) = path?;
    let found = state.fazendas.find_by_id(id).await?;
    Ok(ApiResponse::found(found))
}

/// Partial update; absent or blank fields keep their stored value
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<FazendaUpdateRequest>, JsonRejection>,
) -> ApiResult<Option<FazendaResponse>> {
    let Path(id) = path?;
    let Json(request) = payload?;
    tracing::debug!(user = %user.username, id, "Updating fazenda");

    let updated = state.fazendas.update(id, request).await?;
    Ok(ApiResponse::found(updated))
}

/// Always 204, whether or not the farm existed
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    tracing::debug!(user = %user.username, id, "Deleting fazenda");

    state.fazendas.delete(id).await?;
    Ok(ApiResponse::no_content())
}
