use tracing::instrument;

use super::AuthError;

/// Hash a password for storage in `usuarios.senha`
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a plain password against a stored bcrypt hash.
///
/// A malformed hash is an error, not a mismatch.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Same as `verify_password`, run on the blocking pool so the runtime keeps serving requests
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(format!("verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("password", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("password", &hash).unwrap());
        assert!(!verify_password("Password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_error() {
        assert!(matches!(verify_password("password", "plain-text"), Err(AuthError::Hashing(_))));
    }

    #[tokio::test]
    async fn blocking_variant_matches() {
        let hash = hash_password("segredo", 4).unwrap();
        assert!(verify_password_blocking("segredo".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("errado".to_string(), hash).await.unwrap());
    }
}
