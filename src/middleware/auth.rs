use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{extract_bearer, AuthError};
use crate::error::ApiError;

pub use crate::auth::AuthUser;

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = {
        let header = match request.headers().get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
            None => None,
        };
        extract_bearer(header)?.to_string()
    };

    let auth_user = state.tokens.authenticate(&token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Rejected request: {}", e);
        e
    })?;
    tracing::debug!(user = %auth_user.username, "Authenticated request");

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
