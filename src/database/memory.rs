// In-process repositories backed by ordered maps, used by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{Fazenda, NewFazenda, NewUsuario, Usuario};
use super::repository::{FazendaRepository, UsuarioRepository};

#[derive(Default)]
pub struct InMemoryFazendaRepository {
    rows: RwLock<BTreeMap<i64, Fazenda>>,
    next_id: AtomicI64,
}

impl InMemoryFazendaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered(&self, predicate: impl Fn(&Fazenda) -> bool) -> Vec<Fazenda> {
        let rows = self.rows.read().await;
        rows.values().filter(|f| predicate(*f)).cloned().collect()
    }
}

#[async_trait]
impl FazendaRepository for InMemoryFazendaRepository {
    async fn find_page(&self, offset: i64, limit: Option<i64>) -> Result<Vec<Fazenda>, DatabaseError> {
        let rows = self.rows.read().await;
        let skipped = rows.values().skip(offset.max(0) as usize);
        let page = match limit {
            Some(limit) => skipped.take(limit.max(0) as usize).cloned().collect(),
            None => skipped.cloned().collect(),
        };
        Ok(page)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Fazenda>, DatabaseError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, fazenda: NewFazenda) -> Result<Fazenda, DatabaseError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let row = Fazenda {
            id,
            nome: fazenda.nome,
            localizacao: fazenda.localizacao,
            quantidade_vacas: fazenda.quantidade_vacas,
            fundacao: fazenda.fundacao,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, fazenda: &Fazenda) -> Result<Option<Fazenda>, DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&fazenda.id) {
            Some(existing) => {
                existing.nome = fazenda.nome.clone();
                existing.localizacao = fazenda.localizacao.clone();
                existing.quantidade_vacas = fazenda.quantidade_vacas;
                existing.fundacao = fazenda.fundacao;
                existing.updated_at = Utc::now();
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn find_by_nome_ignore_case(&self, nome: &str) -> Result<Option<Fazenda>, DatabaseError> {
        let needle = nome.to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows.values().find(|f| f.nome.to_lowercase() == needle).cloned())
    }

    async fn find_by_localizacao_containing(&self, localizacao: &str) -> Result<Vec<Fazenda>, DatabaseError> {
        let needle = localizacao.to_lowercase();
        Ok(self
            .filtered(|f| {
                f.localizacao
                    .as_deref()
                    .map(|l| l.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .await)
    }

    async fn find_by_quantidade_vacas_min(&self, minimo: i32) -> Result<Vec<Fazenda>, DatabaseError> {
        Ok(self
            .filtered(|f| f.quantidade_vacas.map(|q| q >= minimo).unwrap_or(false))
            .await)
    }

    async fn find_by_quantidade_vacas_between(&self, min: i32, max: i32) -> Result<Vec<Fazenda>, DatabaseError> {
        Ok(self
            .filtered(|f| f.quantidade_vacas.map(|q| q >= min && q <= max).unwrap_or(false))
            .await)
    }

    async fn exists_by_nome_ignore_case(&self, nome: &str) -> Result<bool, DatabaseError> {
        Ok(self.find_by_nome_ignore_case(nome).await?.is_some())
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsuarioRepository {
    rows: RwLock<BTreeMap<String, Usuario>>,
    next_id: AtomicI64,
}

impl InMemoryUsuarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsuarioRepository for InMemoryUsuarioRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, DatabaseError> {
        Ok(self.rows.read().await.get(email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        Ok(self.rows.read().await.contains_key(email))
    }

    async fn insert(&self, usuario: NewUsuario) -> Result<Usuario, DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&usuario.email) {
            return Err(DatabaseError::Duplicate(format!("usuario {}", usuario.email)));
        }
        let row = Usuario {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            nome: usuario.nome,
            email: usuario.email.clone(),
            senha: usuario.senha,
            perfil: usuario.perfil,
            enabled: Some(usuario.enabled),
        };
        rows.insert(usuario.email, row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nova(nome: &str, localizacao: Option<&str>, vacas: Option<i32>) -> NewFazenda {
        NewFazenda {
            nome: nome.to_string(),
            localizacao: localizacao.map(str::to_string),
            quantidade_vacas: vacas,
            fundacao: None,
        }
    }

    async fn seeded() -> InMemoryFazendaRepository {
        let repo = InMemoryFazendaRepository::new();
        repo.insert(nova("Boa Vista", Some("Minas Gerais"), Some(10))).await.unwrap();
        repo.insert(nova("Santa Rita", Some("minas novas"), Some(50))).await.unwrap();
        repo.insert(nova("Esperança", Some("Goiás"), Some(100))).await.unwrap();
        repo.insert(nova("Sem Gado", None, None)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn ids_are_sequential_and_pages_ordered() {
        let repo = seeded().await;
        let ids: Vec<i64> = repo.find_page(0, None).await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let page: Vec<i64> = repo.find_page(1, Some(2)).await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(page, vec![2, 3]);
    }

    #[tokio::test]
    async fn range_is_inclusive_and_skips_unknown_counts() {
        let repo = seeded().await;
        let nomes: Vec<String> = repo
            .find_by_quantidade_vacas_between(10, 50)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.nome)
            .collect();
        assert_eq!(nomes, vec!["Boa Vista", "Santa Rita"]);

        assert!(repo.find_by_quantidade_vacas_between(60, 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn name_and_location_matching_ignore_case() {
        let repo = seeded().await;
        assert_eq!(
            repo.find_by_nome_ignore_case("boa vista").await.unwrap().map(|f| f.id),
            Some(1)
        );
        assert!(repo.exists_by_nome_ignore_case("ESPERANÇA").await.unwrap());
        assert!(!repo.exists_by_nome_ignore_case("Boa").await.unwrap());

        let minas = repo.find_by_localizacao_containing("MINAS").await.unwrap();
        assert_eq!(minas.len(), 2);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let repo = seeded().await;
        assert!(repo.delete_by_id(2).await.unwrap());
        assert!(!repo.delete_by_id(2).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let repo = InMemoryUsuarioRepository::new();
        let novo = NewUsuario {
            nome: "Admin".to_string(),
            email: "admin@ceialmilk.com".to_string(),
            senha: "hash".to_string(),
            perfil: "ADMIN".to_string(),
            enabled: true,
        };
        repo.insert(novo.clone()).await.unwrap();
        let err = repo.insert(novo).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
        assert!(repo.exists_by_email("admin@ceialmilk.com").await.unwrap());
    }
}
