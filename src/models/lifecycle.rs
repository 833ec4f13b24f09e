// src/models/lifecycle.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Estado de vida de qualquer entidade com exclusão lógica
/// (empresas, planos, usuários, produtos, funcionários).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Active,
    Disabled,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }
}

/// Acesso uniforme ao ciclo de vida, para não espalhar `lifecycle == Active` pelo código.
pub trait HasLifecycle {
    fn lifecycle(&self) -> Lifecycle;

    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_lowercase_tag() {
        assert_eq!(serde_json::to_string(&Lifecycle::Disabled).unwrap(), "\"disabled\"");
        let parsed: Lifecycle = serde_json::from_str("\"active\"").unwrap();
        assert!(parsed.is_active());
    }
}
