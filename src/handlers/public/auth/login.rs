// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{AuthResponse, LoginRequest};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/**
 * POST /api/auth/login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "email": "admin@ceialmilk.com", "password": "password" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "data": {
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "type": "Bearer",
 *     "email": "admin@ceialmilk.com",
 *     "perfil": "ADMIN",
 *     "expiresIn": 3600
 *   }
 * }
 * ```
 *
 * Unknown user, disabled user and wrong password all answer 401 with the
 * same body.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(request) = payload?;

    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let response = state.auth.login(request).await?;
    Ok(ApiResponse::success(response))
}
