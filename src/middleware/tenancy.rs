// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::AuthContext};

// A empresa em que a requisição opera. Vem sempre do token (via
// auth_guard), nunca de cabeçalho ou corpo enviados pelo cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext(pub i64);

impl TenantContext {
    /// Rejeita payloads que tentam operar em outra empresa.
    pub fn ensure_same_company(&self, claimed: Option<i64>) -> Result<(), AppError> {
        match claimed {
            Some(company_id) if company_id != self.0 => {
                tracing::warn!(token_company = self.0, claimed = company_id, "Tentativa de acesso a outra empresa");
                Err(AppError::Forbidden)
            }
            _ => Ok(()),
        }
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .map(|ctx| TenantContext(ctx.company_id))
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_company_is_forbidden() {
        let tenant = TenantContext(4);
        assert!(tenant.ensure_same_company(None).is_ok());
        assert!(tenant.ensure_same_company(Some(4)).is_ok());
        assert!(matches!(tenant.ensure_same_company(Some(5)), Err(AppError::Forbidden)));
    }
}
