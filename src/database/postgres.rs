use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Fazenda, NewFazenda, NewUsuario, Usuario};
use super::repository::{FazendaRepository, UsuarioRepository};

const FAZENDA_COLUMNS: &str =
    "id, nome, localizacao, quantidade_vacas, fundacao, created_at, updated_at";

const USUARIO_COLUMNS: &str = "id, nome, email, senha, perfil, enabled";

/// Escape LIKE wildcards so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct PgFazendaRepository {
    pool: PgPool,
}

impl PgFazendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FazendaRepository for PgFazendaRepository {
    async fn find_page(&self, offset: i64, limit: Option<i64>) -> Result<Vec<Fazenda>, DatabaseError> {
        // LIMIT NULL means no limit in PostgreSQL
        let sql = format!(
            "SELECT {} FROM fazendas ORDER BY id LIMIT $1 OFFSET $2",
            FAZENDA_COLUMNS
        );
        let rows = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Fazenda>, DatabaseError> {
        let sql = format!("SELECT {} FROM fazendas WHERE id = $1", FAZENDA_COLUMNS);
        let row = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, fazenda: NewFazenda) -> Result<Fazenda, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO fazendas (nome, localizacao, quantidade_vacas, fundacao, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {}
            "#,
            FAZENDA_COLUMNS
        );
        let row = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(&fazenda.nome)
            .bind(&fazenda.localizacao)
            .bind(fazenda.quantidade_vacas)
            .bind(fazenda.fundacao)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, fazenda: &Fazenda) -> Result<Option<Fazenda>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE fazendas
            SET nome = $2, localizacao = $3, quantidade_vacas = $4, fundacao = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FAZENDA_COLUMNS
        );
        let row = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(fazenda.id)
            .bind(&fazenda.nome)
            .bind(&fazenda.localizacao)
            .bind(fazenda.quantidade_vacas)
            .bind(fazenda.fundacao)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM fazendas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_nome_ignore_case(&self, nome: &str) -> Result<Option<Fazenda>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM fazendas WHERE LOWER(nome) = LOWER($1) ORDER BY id LIMIT 1",
            FAZENDA_COLUMNS
        );
        let row = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(nome)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_localizacao_containing(&self, localizacao: &str) -> Result<Vec<Fazenda>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM fazendas WHERE localizacao ILIKE $1 ESCAPE '\\' ORDER BY id",
            FAZENDA_COLUMNS
        );
        let rows = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(format!("%{}%", escape_like(localizacao)))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_quantidade_vacas_min(&self, minimo: i32) -> Result<Vec<Fazenda>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM fazendas WHERE quantidade_vacas >= $1 ORDER BY id",
            FAZENDA_COLUMNS
        );
        let rows = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(minimo)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_quantidade_vacas_between(&self, min: i32, max: i32) -> Result<Vec<Fazenda>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM fazendas WHERE quantidade_vacas BETWEEN $1 AND $2 ORDER BY id",
            FAZENDA_COLUMNS
        );
        let rows = sqlx::query_as::<_, Fazenda>(&sql)
            .bind(min)
            .bind(max)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn exists_by_nome_ignore_case(&self, nome: &str) -> Result<bool, DatabaseError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM fazendas WHERE LOWER(nome) = LOWER($1))")
                .bind(nome)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fazendas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[derive(Clone)]
pub struct PgUsuarioRepository {
    pool: PgPool,
}

impl PgUsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepository for PgUsuarioRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, DatabaseError> {
        let sql = format!("SELECT {} FROM usuarios WHERE email = $1", USUARIO_COLUMNS);
        let row = sqlx::query_as::<_, Usuario>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM usuarios WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists.0)
    }

    async fn insert(&self, usuario: NewUsuario) -> Result<Usuario, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO usuarios (nome, email, senha, perfil, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USUARIO_COLUMNS
        );
        let result = sqlx::query_as::<_, Usuario>(&sql)
            .bind(&usuario.nome)
            .bind(&usuario.email)
            .bind(&usuario.senha)
            .bind(&usuario.perfil)
            .bind(usuario.enabled)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DatabaseError::Duplicate(format!("usuario {}", usuario.email)))
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("Minas"), "Minas");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
