// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::lifecycle::{HasLifecycle, Lifecycle};

// --- Enums ---

/// Papel do usuário no registro global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Operador da plataforma (painel master).
    Master,
    /// Dono/gestor de uma empresa.
    Admin,
    /// Usuário comum da empresa (caixa, garçom).
    Operator,
}

// Representa um usuário vindo do registro global
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,
    pub lifecycle: Lifecycle,
    pub is_demo: bool,
    pub demo_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasLifecycle for User {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

impl User {
    /// Conta de demonstração cujo prazo já passou.
    pub fn demo_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.is_demo && self.demo_expires_at.is_some_and(|expires| now > expires)
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,        // Subject (ID do usuário)
    pub company_id: i64, // Empresa concedida pelo token
    pub role: UserRole,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

/// Contexto resolvido pelo guardião de autenticação e injetado na requisição.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub user_id: i64,
    pub company_id: i64,
    pub role: UserRole,
    pub demo_expires_at: Option<DateTime<Utc>>,
}

// --- Payloads ---

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "dono@padaria.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Cadastro de conta de demonstração (empresa + administrador)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoSignupPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Lanchonete do Zé")]
    pub company_name: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Criação de usuário dentro da empresa do administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Só é aceito se for igual à empresa do token.
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// --- Respostas ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
