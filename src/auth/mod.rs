pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MIN_JWT_SECRET_BYTES};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret: must be at least {0} bytes")]
    InvalidSecret(usize),

    #[error("Invalid JWT expiration: {0} seconds")]
    InvalidExpiration(u64),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    /// Comma-joined authorities, e.g. `ROLE_ADMIN`
    pub authorities: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated principal extracted from a valid token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            authorities: split_authorities(&claims.authorities),
        }
    }
}

fn split_authorities(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Signs and verifies HS256 tokens with a shared secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiration_secs: u64) -> Result<Self, AuthError> {
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(AuthError::InvalidSecret(MIN_JWT_SECRET_BYTES));
        }

        let expiration = i64::try_from(expiration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(AuthError::InvalidExpiration(expiration_secs))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiration_secs)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiration.num_seconds()
    }

    pub fn generate_token(&self, subject: &str, authorities: &[String]) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            authorities: authorities.join(","),
            iat: now.timestamp(),
            exp: (now + self.expiration).timestamp(),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn is_valid(&self, token: &str) -> bool {
        match self.validate_token(token) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Invalid JWT token: {}", e);
                false
            }
        }
    }

    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.validate_token(token).map(AuthUser::from)
    }
}

/// Pull the bearer token out of an `Authorization` header value
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
