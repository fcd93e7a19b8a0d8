// handlers/public/auth/validate.rs - POST /api/auth/validate handler

use axum::extract::State;

use crate::api::{TokenValidation, ValidateRequest};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/validate - report whether the posted token is currently valid.
///
/// Always 200; an unusable body simply yields `{"valid": false}`.
pub async fn validate_post(State(state): State<AppState>, body: String) -> ApiResult<TokenValidation> {
    let request = ValidateRequest::from_body(&body);
    let valid = state.auth.validate(&request.token);
    Ok(ApiResponse::success(TokenValidation { valid }))
}
