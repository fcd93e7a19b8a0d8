use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::{AuthResponse, LoginRequest};
use crate::auth::password::verify_password_blocking;
use crate::auth::{AuthError, TokenService};
use crate::database::UsuarioRepository;

const ROLE_PREFIX: &str = "ROLE_";
const DEFAULT_PERFIL: &str = "USER";

/// Credential check and token issuance for `/api/auth/*`.
pub struct AuthService {
    usuarios: Arc<dyn UsuarioRepository>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(usuarios: Arc<dyn UsuarioRepository>, tokens: Arc<TokenService>) -> Self {
        Self { usuarios, tokens }
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Every rejection collapses into `AuthError::InvalidCredentials`; the
    /// reason is only logged.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let LoginRequest { email, password } = request;

        let usuario = match self.usuarios.find_by_email(&email).await {
            Ok(Some(usuario)) => usuario,
            Ok(None) => {
                warn!(%email, "Login rejected: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(%email, error = %e, "Login rejected: user lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !usuario.is_enabled() {
            warn!(%email, "Login rejected: user disabled");
            return Err(AuthError::InvalidCredentials);
        }

        match verify_password_blocking(password, usuario.senha.clone()).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(%email, "Login rejected: password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(%email, error = %e, "Login rejected: stored hash unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let authorities = vec![usuario.authority()];
        let token = self.tokens.generate_token(&usuario.email, &authorities)?;
        info!(%email, "Login succeeded");

        Ok(AuthResponse::bearer(
            token,
            usuario.email,
            perfil_from_authorities(&authorities),
            self.tokens.expires_in(),
        ))
    }

    pub fn validate(&self, token: &str) -> bool {
        !token.is_empty() && self.tokens.is_valid(token)
    }
}

/// First authority without its `ROLE_` prefix, or `USER`.
fn perfil_from_authorities(authorities: &[String]) -> String {
    authorities
        .first()
        .map(|a| a.strip_prefix(ROLE_PREFIX).unwrap_or(a).to_string())
        .unwrap_or_else(|| DEFAULT_PERFIL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::database::{InMemoryUsuarioRepository, NewUsuario};

    const SECRET: &str = "auth-service-test-secret-0123456789abcdef";

    async fn service() -> AuthService {
        let usuarios = InMemoryUsuarioRepository::new();
        for (email, perfil, enabled) in [
            ("admin@ceialmilk.com", "ADMIN", true),
            ("inativo@ceialmilk.com", "USER", false),
        ] {
            usuarios
                .insert(NewUsuario {
                    nome: "Teste".to_string(),
                    email: email.to_string(),
                    senha: hash_password("password", 4).unwrap(),
                    perfil: perfil.to_string(),
                    enabled,
                })
                .await
                .unwrap();
        }
        let tokens = TokenService::new(SECRET, 3600).unwrap();
        AuthService::new(Arc::new(usuarios), Arc::new(tokens))
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_issues_valid_token() {
        let auth = service().await;
        let response = auth.login(login("admin@ceialmilk.com", "password")).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.email, "admin@ceialmilk.com");
        assert_eq!(response.perfil, "ADMIN");
        assert_eq!(response.expires_in, 3600);
        assert!(auth.validate(&response.token));
    }

    #[tokio::test]
    async fn every_rejection_looks_the_same() {
        let auth = service().await;
        for (email, password) in [
            ("admin@ceialmilk.com", "wrong"),
            ("nobody@ceialmilk.com", "password"),
            ("inativo@ceialmilk.com", "password"),
        ] {
            let err = auth.login(login(email, password)).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials), "{} should be rejected", email);
        }
    }

    #[tokio::test]
    async fn validate_rejects_empty_and_garbage() {
        let auth = service().await;
        assert!(!auth.validate(""));
        assert!(!auth.validate("garbage"));
    }

    #[test]
    fn perfil_strips_role_prefix() {
        assert_eq!(perfil_from_authorities(&["ROLE_ADMIN".to_string()]), "ADMIN");
        assert_eq!(perfil_from_authorities(&["GESTOR".to_string()]), "GESTOR");
        assert_eq!(perfil_from_authorities(&[]), "USER");
    }
}
