// src/db/finance_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::common::error::AppError;
use crate::models::finance::{CashClosure, PaymentTotals};

#[derive(Clone, Default)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    /// Grava o retrato do fechamento de caixa (declarado x esperado).
    pub async fn insert_cash_closure<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        employee_id: Option<i64>,
        opened_at: DateTime<Utc>,
        reported: PaymentTotals,
        expected: PaymentTotals,
        notes: Option<&str>,
    ) -> Result<CashClosure, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let difference = reported.total() - expected.total();

        let closure = sqlx::query_as::<_, CashClosure>(
            r#"
            INSERT INTO cash_closures (
                company_id, employee_id, opened_at, closed_at,
                reported_cash, reported_card, reported_pix,
                expected_cash, expected_card, expected_pix,
                difference, notes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(employee_id)
        .bind(opened_at)
        .bind(Utc::now())
        .bind(reported.cash)
        .bind(reported.card)
        .bind(reported.pix)
        .bind(expected.cash)
        .bind(expected.card)
        .bind(expected.pix)
        .bind(difference)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(closure)
    }

    pub async fn list_cash_closures<'e, E>(&self, executor: E, company_id: i64) -> Result<Vec<CashClosure>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let closures = sqlx::query_as::<_, CashClosure>(
            "SELECT * FROM cash_closures WHERE company_id = ? ORDER BY id DESC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(closures)
    }
}
