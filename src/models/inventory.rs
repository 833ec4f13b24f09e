// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::common::money::Money;
use crate::models::lifecycle::{HasLifecycle, Lifecycle};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    #[schema(ignore)] // vem do token, não precisa aparecer na doc
    pub company_id: i64,
    #[schema(example = "Coxinha de frango")]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    #[schema(example = 40)]
    pub stock: i64,
    #[schema(example = "7891234567895")]
    pub barcode: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasLifecycle for Product {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

// ---
// Validação Customizada
// ---
pub(crate) fn validate_money_amount(val: &Money) -> Result<(), ValidationError> {
    let message = if val.is_negative() {
        "O valor não pode ser negativo."
    } else if *val > Money::MAX_INPUT {
        "O valor excede o máximo de R$ 10.000.000,00."
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    Err(err)
}

fn validate_stock_delta(delta: i64) -> Result<(), ValidationError> {
    if delta.unsigned_abs() > 1_000_000 {
        let mut err = ValidationError::new("range");
        err.message = Some("Ajuste fora do intervalo permitido.".into());
        return Err(err);
    }
    Ok(())
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,

    #[validate(custom(function = "validate_money_amount"))]
    pub price: Money,

    #[validate(range(min = 0, max = 1_000_000, message = "O estoque deve estar entre 0 e 1.000.000."))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub stock: i64,

    pub barcode: Option<String>,

    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_money_amount"))]
    pub price: Option<Money>,
    #[validate(range(min = 0, max = 1_000_000, message = "O estoque deve estar entre 0 e 1.000.000."))]
    pub stock: Option<i64>,
    pub barcode: Option<String>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

/// Ajuste manual de estoque (entrada positiva, perda negativa).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentPayload {
    #[schema(example = 12)]
    #[validate(custom(function = "validate_stock_delta"))]
    pub delta: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Inclui produtos desativados na listagem.
    #[serde(default)]
    pub include_disabled: bool,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}
