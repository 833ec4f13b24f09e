// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{AuthContext, UserRole},
};

/// 1. O Trait que define quais papéis passam pelo guardião
pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
    fn label() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .ok_or(AppError::Unauthorized)?;

        if !T::allows(context.role) {
            tracing::warn!(user_id = context.user_id, required = T::label(), "Acesso negado por papel");
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

/// Painel master (planos e empresas).
pub struct MasterOnly;
impl RoleDef for MasterOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Master
    }
    fn label() -> &'static str {
        "master"
    }
}

/// Administração da empresa (usuários). O master também passa.
pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::Admin | UserRole::Master)
    }
    fn label() -> &'static str {
        "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_not_admins() {
        assert!(AdminOnly::allows(UserRole::Admin));
        assert!(AdminOnly::allows(UserRole::Master));
        assert!(!AdminOnly::allows(UserRole::Operator));
        assert!(!MasterOnly::allows(UserRole::Admin));
    }
}
