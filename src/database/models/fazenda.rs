use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `fazendas` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Fazenda {
    pub id: i64,
    pub nome: String,
    pub localizacao: Option<String>,
    pub quantidade_vacas: Option<i32>,
    pub fundacao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable farm; id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFazenda {
    pub nome: String,
    pub localizacao: Option<String>,
    pub quantidade_vacas: Option<i32>,
    pub fundacao: Option<NaiveDate>,
}
