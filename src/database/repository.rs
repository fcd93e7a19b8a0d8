use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Fazenda, NewFazenda, NewUsuario, Usuario};

/// Storage operations over the `fazendas` table.
///
/// Every list result is ordered by id ascending.
#[async_trait]
pub trait FazendaRepository: Send + Sync {
    /// A window of farms; `limit = None` returns everything from `offset` on.
    async fn find_page(&self, offset: i64, limit: Option<i64>) -> Result<Vec<Fazenda>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Fazenda>, DatabaseError>;

    async fn insert(&self, fazenda: NewFazenda) -> Result<Fazenda, DatabaseError>;

    /// Overwrite all mutable columns of an existing row and stamp `updated_at`.
    /// Returns `None` when the row is gone.
    async fn update(&self, fazenda: &Fazenda) -> Result<Option<Fazenda>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Exact, case-insensitive name match; first by id when several share a name.
    async fn find_by_nome_ignore_case(&self, nome: &str) -> Result<Option<Fazenda>, DatabaseError>;

    async fn find_by_localizacao_containing(&self, localizacao: &str) -> Result<Vec<Fazenda>, DatabaseError>;

    async fn find_by_quantidade_vacas_min(&self, minimo: i32) -> Result<Vec<Fazenda>, DatabaseError>;

    /// Inclusive at both bounds.
    async fn find_by_quantidade_vacas_between(&self, min: i32, max: i32) -> Result<Vec<Fazenda>, DatabaseError>;

    async fn exists_by_nome_ignore_case(&self, nome: &str) -> Result<bool, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;

    /// Connectivity check for `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, DatabaseError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError>;

    async fn insert(&self, usuario: NewUsuario) -> Result<Usuario, DatabaseError>;
}
