// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::money::Money;
use crate::models::lifecycle::{HasLifecycle, Lifecycle};

// ---
// 1. Plan (Plano de assinatura)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    #[schema(example = "Profissional")]
    pub name: String,
    pub price: Money,
    pub max_users: Option<i64>,
    pub max_products: Option<i64>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasLifecycle for Plan {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

// ---
// 2. Company (A empresa / tenant)
// ---
// Fica no registro global, nunca dentro do próprio arquivo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    #[schema(example = "Padaria Pão Quente")]
    pub name: String,
    /// CNPJ
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan_id: Option<i64>,
    pub lifecycle: Lifecycle,
    pub is_demo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasLifecycle for Company {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

/// Empresa com os acumulados lidos do seu próprio arquivo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    #[serde(flatten)]
    pub company: Company,
    pub total_sales: Money,
    pub sales_count: i64,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, message = "O nome do plano é obrigatório."))]
    pub name: String,
    pub price: Money,
    #[validate(range(min = 1, message = "O limite deve ser positivo."))]
    pub max_users: Option<i64>,
    #[validate(range(min = 1, message = "O limite deve ser positivo."))]
    pub max_products: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanPayload {
    #[validate(length(min = 1, message = "O nome do plano é obrigatório."))]
    pub name: Option<String>,
    pub price: Option<Money>,
    #[validate(range(min = 1, message = "O limite deve ser positivo."))]
    pub max_users: Option<i64>,
    #[validate(range(min = 1, message = "O limite deve ser positivo."))]
    pub max_products: Option<i64>,
}

// O que o painel master envia para provisionar uma empresa
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: String,
    pub document: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan_id: Option<i64>,

    // Primeiro administrador da empresa
    #[validate(length(min = 1, message = "O nome do administrador é obrigatório."))]
    pub admin_name: String,
    #[validate(email(message = "O e-mail do administrador é inválido."))]
    pub admin_email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub name: Option<String>,
    pub document: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan_id: Option<i64>,
}

/// Resultado do provisionamento: a empresa e o id do primeiro administrador.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedCompany {
    pub company: Company,
    pub admin_user_id: i64,
}
