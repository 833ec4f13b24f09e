use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::operations::OrderStatus;

// Nosso tipo de erro único. Cada variante de domínio vira um 4xx com
// mensagem legível; o resto vira um 500 genérico.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Identificador de empresa inválido: {0}")]
    InvalidTenant(String),

    #[error("Token de autenticação inválido ou ausente.")]
    Unauthorized,

    #[error("Acesso negado a este recurso.")]
    Forbidden,

    #[error("O período de demonstração expirou.")]
    DemoExpired,

    #[error("E-mail ou senha inválidos.")]
    InvalidCredentials,

    #[error("{0} não encontrado.")]
    NotFound(&'static str),

    #[error("Não há pedidos abertos para a mesa {0}.")]
    NothingToClose(i64),

    #[error("Estoque insuficiente para o produto {product_id}: disponível {available}, solicitado {requested}.")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("O campo '{0}' é obrigatório.")]
    MissingField(&'static str),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Já existe um registro com este valor de '{field}'.")]
    Conflict { field: &'static str },

    #[error("Não é possível mudar o pedido de '{from}' para '{to}'.")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao aplicar o esquema: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Erro de um único campo, no mesmo formato que o `validator` produz.
    pub fn invalid_field(field: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new("range");
        error.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }

    /// Código estável usado pelo frontend para distinguir os casos
    /// (ex.: mostrar a tela de "demonstração expirada").
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidTenant(_) => "INVALID_TENANT",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DemoExpired => "DEMO_EXPIRED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NothingToClose(_) => "NOTHING_TO_CLOSE",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::MissingField(_) | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidTenant(_)
            | AppError::MissingField(_)
            | AppError::ValidationError(_)
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::DemoExpired | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NothingToClose(_)
            | AppError::Conflict { .. }
            | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "code": code,
                    "details": details,
                })
            }
            AppError::Conflict { field } => json!({
                "error": self.to_string(),
                "code": code,
                "field": field,
            }),
            e if status.is_server_error() => {
                // O detalhe fica só no log; o cliente recebe a mensagem genérica.
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado.", "code": code })
            }
            e => json!({ "error": e.to_string(), "code": code }),
        };

        (status, Json(body)).into_response()
    }
}
