// src/db/dashboard_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::common::error::AppError;
use crate::common::money::Money;
use crate::models::dashboard::CompanyTotals;

/// Acumulados da empresa (`company_totals`), uma linha por arquivo.
#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_totals<'e, E>(&self, executor: E, company_id: i64) -> Result<CompanyTotals, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let totals = sqlx::query_as::<_, CompanyTotals>(
            "SELECT total_sales, sales_count FROM company_totals WHERE company_id = ?",
        )
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(totals.unwrap_or_default())
    }

    /// `total_sales += amount`, `sales_count += 1`, criando a linha se preciso.
    pub async fn record_sale<'e, E>(&self, executor: E, company_id: i64, amount: Money) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO company_totals (company_id, total_sales, sales_count, updated_at)
            VALUES (?, ?, 1, ?)
            ON CONFLICT (company_id) DO UPDATE SET
                total_sales = total_sales + excluded.total_sales,
                sales_count = sales_count + 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(company_id)
        .bind(amount)
        .bind(Utc::now())
        .execute(executor)
        .await?;
        Ok(())
    }
}
