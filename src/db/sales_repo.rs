// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::common::error::AppError;
use crate::common::money::Money;
use crate::models::finance::PaymentTotals;
use crate::models::sales::{PaymentMethod, PricedLine, Sale, SaleItem};

/// Cabeçalho de uma venda a ser gravada.
#[derive(Debug, Clone)]
pub struct NewSale<'a> {
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub table_number: Option<i64>,
    pub total: Money,
    pub discount: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<&'a str>,
}

/// Vendas são só de inserção: não existe update nem delete aqui.
#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert_sale<'e, E>(&self, executor: E, company_id: i64, sale: NewSale<'_>) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let created = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                company_id, customer_id, employee_id, table_number,
                total, discount, payment_method, notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(sale.customer_id)
        .bind(sale.employee_id)
        .bind(sale.table_number)
        .bind(sale.total)
        .bind(sale.discount)
        .bind(sale.payment_method)
        .bind(sale.notes)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    pub async fn insert_sale_item<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        sale_id: i64,
        line: &PricedLine,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (company_id, sale_id, product_id, quantity, unit_price, subtotal)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Mais recentes primeiro.
    pub async fn list_sales<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE company_id = ? ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;
        Ok(sales)
    }

    pub async fn find_sale<'e, E>(&self, executor: E, company_id: i64, sale_id: i64) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(sale_id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_sale_items<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        sale_id: i64,
    ) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE company_id = ? AND sale_id = ? ORDER BY id ASC",
        )
        .bind(company_id)
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Vendido por forma de pagamento a partir de `since` (janela do caixa).
    pub async fn payment_totals_since<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        since: DateTime<Utc>,
    ) -> Result<PaymentTotals, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, (PaymentMethod, Money)>(
            r#"
            SELECT payment_method, COALESCE(SUM(total), 0)
            FROM sales
            WHERE company_id = ? AND created_at >= ?
            GROUP BY payment_method
            "#,
        )
        .bind(company_id)
        .bind(since)
        .fetch_all(executor)
        .await?;

        let mut totals = PaymentTotals::default();
        for (method, total) in rows {
            match method {
                PaymentMethod::Cash => totals.cash += total,
                PaymentMethod::Card => totals.card += total,
                PaymentMethod::Pix => totals.pix += total,
            }
        }
        Ok(totals)
    }

    /// Faturamento e número de vendas a partir de `since`.
    pub async fn revenue_since<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        since: DateTime<Utc>,
    ) -> Result<(Money, i64), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, (Money, i64)>(
            "SELECT COALESCE(SUM(total), 0), COUNT(*) FROM sales WHERE company_id = ? AND created_at >= ?",
        )
        .bind(company_id)
        .bind(since)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }
}
