// src/services/finance_service.rs

use std::sync::Arc;

use chrono::Utc;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{FinanceRepository, SalesRepository, TenantRegistry},
    models::finance::{CashClosure, CreateCashClosurePayload, PaymentTotals},
    services::sales_service::ensure_sale_references,
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    sales_repo: SalesRepository,
    registry: Arc<TenantRegistry>,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, sales_repo: SalesRepository, registry: Arc<TenantRegistry>) -> Self {
        Self { repo, sales_repo, registry }
    }

    /// Fecha o caixa: compara o declarado pelo operador com o vendido
    /// desde `opened_at`, por forma de pagamento.
    pub async fn close_cash_session(
        &self,
        company_id: i64,
        payload: &CreateCashClosurePayload,
    ) -> Result<CashClosure, AppError> {
        if payload.opened_at > Utc::now() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "openedAt",
                ValidationError::new("range").with_message("A abertura do caixa não pode estar no futuro.".into()),
            );
            return Err(AppError::ValidationError(errors));
        }

        let store = self.registry.store(company_id).await?;
        let mut tx = store.begin().await?;

        ensure_sale_references(&mut *tx, company_id, None, payload.employee_id).await?;

        let expected = self
            .sales_repo
            .payment_totals_since(&mut *tx, company_id, payload.opened_at)
            .await?;

        let reported = PaymentTotals {
            cash: payload.reported_cash,
            card: payload.reported_card,
            pix: payload.reported_pix,
        };

        let closure = self
            .repo
            .insert_cash_closure(
                &mut *tx,
                company_id,
                payload.employee_id,
                payload.opened_at,
                reported,
                expected,
                blank_to_none(payload.notes.as_deref()),
            )
            .await?;

        tx.commit().await?;

        if closure.difference.is_negative() {
            tracing::warn!(company_id, closure_id = closure.id, difference = %closure.difference, "Caixa fechado com falta");
        } else {
            tracing::info!(company_id, closure_id = closure.id, "🧮 Caixa fechado");
        }
        Ok(closure)
    }

    pub async fn list_cash_closures(&self, company_id: i64) -> Result<Vec<CashClosure>, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo.list_cash_closures(&store, company_id).await
    }
}
