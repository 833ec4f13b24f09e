// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    #[schema(example = "Maria da Silva")]
    pub name: String,
    /// CPF, único por empresa.
    #[schema(example = "12345678909")]
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aceita o CPF com ou sem máscara, exige 11 dígitos.
fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    let digits = cpf.chars().filter(char::is_ascii_digit).count();
    let only_mask = cpf.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if digits != 11 || !only_mask {
        let mut err = ValidationError::new("cpf");
        err.message = Some("O CPF deve ter 11 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

/// Guarda o CPF só com dígitos, para a unicidade não depender da máscara.
pub(crate) fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_accepts_masked_and_plain() {
        assert!(validate_cpf("123.456.789-09").is_ok());
        assert!(validate_cpf("12345678909").is_ok());
        assert!(validate_cpf("1234").is_err());
        assert!(validate_cpf("123a5678909").is_err());
        assert_eq!(normalize_cpf("123.456.789-09"), "12345678909");
    }
}
