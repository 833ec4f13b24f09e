// src/models/sales.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{error::AppError, money::Money};
use crate::models::inventory::validate_money_amount;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(alias = "dinheiro")]
    Cash,
    #[serde(alias = "cartao", alias = "credito", alias = "debito")]
    Card,
    Pix,
}

// --- Venda (registro apenas de inserção) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
    /// Preenchido quando a venda nasceu do fechamento de uma mesa.
    pub table_number: Option<i64>,
    pub total: Money,
    pub discount: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Linha já precificada, pronta para virar `sale_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl PricedLine {
    pub fn new(product_id: i64, quantity: i64, unit_price: Money) -> Result<Self, AppError> {
        let subtotal = unit_price
            .checked_mul(quantity)
            .ok_or_else(|| AppError::invalid_field("items", "O subtotal da linha excede o limite."))?;
        Ok(Self { product_id, quantity, unit_price, subtotal })
    }

    /// Soma dos subtotais; falha em vez de estourar.
    pub fn total(lines: &[PricedLine]) -> Result<Money, AppError> {
        Money::checked_sum(lines.iter().map(|l| l.subtotal))
            .ok_or_else(|| AppError::invalid_field("items", "O total excede o limite."))
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    pub product_id: i64,
    #[validate(range(min = 1, max = 1_000_000, message = "A quantidade deve estar entre 1 e 1.000.000."))]
    pub quantity: i64,
}

// Checkout direto no PDV
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."), nested)]
    pub items: Vec<SaleLinePayload>,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
    #[serde(default)]
    #[validate(custom(function = "validate_money_amount"))]
    pub discount: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_without_items_fails_validation() {
        let payload: CreateSalePayload =
            serde_json::from_value(serde_json::json!({ "items": [], "paymentMethod": "pix" })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn oversized_line_is_a_validation_error() {
        let err = PricedLine::new(1, 1_000_000, Money::new(rust_decimal::Decimal::MAX)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let line = PricedLine::new(1, 3, Money::from_cents(250)).unwrap();
        assert_eq!(line.subtotal, Money::from_cents(750));
        assert_eq!(PricedLine::total(&[line, line]).unwrap(), Money::from_cents(1500));
    }
}
