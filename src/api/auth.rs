use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub email: String,
    pub perfil: String,
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn bearer(token: String, email: String, perfil: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            email,
            perfil,
            expires_in,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenValidation {
    pub valid: bool,
}

/// Body of `/api/auth/validate`.
///
/// Clients send the bare token, a JSON string literal, or `{"token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateRequest {
    pub token: String,
}

impl ValidateRequest {
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        let token = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::String(token)) => token,
            Ok(Value::Object(map)) => map
                .get("token")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => trimmed.to_string(),
        };
        Self {
            token: token.trim().to_string(),
        }
    }
}
