use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    /// bcrypt hash, never the plain password
    #[serde(skip_serializing)]
    pub senha: String,
    pub perfil: String,
    pub enabled: Option<bool>,
}

impl Usuario {
    /// A missing flag counts as enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// The single authority granted by this user's profile.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.perfil)
    }
}

#[derive(Debug, Clone)]
pub struct NewUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub perfil: String,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(enabled: Option<bool>) -> Usuario {
        Usuario {
            id: 1,
            nome: "Admin".to_string(),
            email: "admin@ceialmilk.com".to_string(),
            senha: "$2b$04$hash".to_string(),
            perfil: "ADMIN".to_string(),
            enabled,
        }
    }

    #[test]
    fn enabled_defaults_to_true() {
        assert!(usuario(None).is_enabled());
        assert!(usuario(Some(true)).is_enabled());
        assert!(!usuario(Some(false)).is_enabled());
    }

    #[test]
    fn authority_is_prefixed_profile() {
        assert_eq!(usuario(None).authority(), "ROLE_ADMIN");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let value = serde_json::to_value(usuario(None)).unwrap();
        assert!(value.get("senha").is_none());
    }
}
