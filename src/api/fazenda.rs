use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::{Fazenda, NewFazenda};
use crate::error::ApiError;

/// Column width of `fazendas.nome` and `fazendas.localizacao`, in characters.
pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FazendaCreateRequest {
    #[serde(default)]
    pub nome: String,
    pub localizacao: Option<String>,
    pub quantidade_vacas: Option<i32>,
    pub fundacao: Option<NaiveDate>,
}

impl FazendaCreateRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        if self.nome.trim().is_empty() {
            field_errors.insert("nome".to_string(), "Nome é obrigatório".to_string());
        }
        check_length("nome", Some(&self.nome), &mut field_errors);
        check_length("localizacao", self.localizacao.as_deref(), &mut field_errors);
        check_quantidade(self.quantidade_vacas, &mut field_errors);

        into_result(field_errors)
    }

    pub fn into_new(self) -> NewFazenda {
        NewFazenda {
            nome: self.nome,
            localizacao: self.localizacao,
            quantidade_vacas: self.quantidade_vacas,
            fundacao: self.fundacao,
        }
    }
}

/// Partial update. `None` and blank strings leave the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FazendaUpdateRequest {
    pub nome: Option<String>,
    pub localizacao: Option<String>,
    pub quantidade_vacas: Option<i32>,
    pub fundacao: Option<NaiveDate>,
}

impl FazendaUpdateRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        check_length("nome", self.nome.as_deref(), &mut field_errors);
        check_length("localizacao", self.localizacao.as_deref(), &mut field_errors);
        check_quantidade(self.quantidade_vacas, &mut field_errors);
        into_result(field_errors)
    }

    pub fn apply_to(self, fazenda: &mut Fazenda) {
        if let Some(nome) = non_blank(self.nome) {
            fazenda.nome = nome;
        }
        if let Some(localizacao) = non_blank(self.localizacao) {
            fazenda.localizacao = Some(localizacao);
        }
        if let Some(quantidade) = self.quantidade_vacas {
            fazenda.quantidade_vacas = Some(quantidade);
        }
        if let Some(fundacao) = self.fundacao {
            fazenda.fundacao = Some(fundacao);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_length(field: &str, value: Option<&str>, field_errors: &mut HashMap<String, String>) {
    if value.map(|v| v.chars().count() > MAX_TEXT_LEN).unwrap_or(false) {
        field_errors.insert(
            field.to_string(),
            format!("Máximo de {} caracteres", MAX_TEXT_LEN),
        );
    }
}

fn check_quantidade(quantidade: Option<i32>, field_errors: &mut HashMap<String, String>) {
    if matches!(quantidade, Some(q) if q < 0) {
        field_errors.insert(
            "quantidadeVacas".to_string(),
            "Quantidade de vacas não pode ser negativa".to_string(),
        );
    }
}

fn into_result(field_errors: HashMap<String, String>) -> Result<(), ApiError> {
    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid fazenda", Some(field_errors)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FazendaResponse {
    pub id: i64,
    pub nome: String,
    pub localizacao: Option<String>,
    pub quantidade_vacas: Option<i32>,
    pub fundacao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Fazenda> for FazendaResponse {
    fn from(f: Fazenda) -> Self {
        Self {
            id: f.id,
            nome: f.nome,
            localizacao: f.localizacao,
            quantidade_vacas: f.quantidade_vacas,
            fundacao: f.fundacao,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}
