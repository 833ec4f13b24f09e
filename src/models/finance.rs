// src/models/finance.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::money::Money;
use crate::models::inventory::validate_money_amount;

/// Fechamento de caixa: retrato do que o operador declarou contra o que o
/// sistema vendeu no período. Registro de auditoria, nunca é alterado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashClosure {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    pub employee_id: Option<i64>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub reported_cash: Money,
    pub reported_card: Money,
    pub reported_pix: Money,
    pub expected_cash: Money,
    pub expected_card: Money,
    pub expected_pix: Money,
    /// Declarado menos esperado (negativo = falta no caixa).
    pub difference: Money,
    pub notes: Option<String>,
}

/// Totais por forma de pagamento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    pub cash: Money,
    pub card: Money,
    pub pix: Money,
}

impl PaymentTotals {
    pub fn total(&self) -> Money {
        self.cash + self.card + self.pix
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCashClosurePayload {
    pub employee_id: Option<i64>,
    /// Início do turno; as vendas a partir daqui compõem o esperado.
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    #[validate(custom(function = "validate_money_amount"))]
    pub reported_cash: Money,
    #[serde(default)]
    #[validate(custom(function = "validate_money_amount"))]
    pub reported_card: Money,
    #[serde(default)]
    #[validate(custom(function = "validate_money_amount"))]
    pub reported_pix: Money,
    pub notes: Option<String>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}
