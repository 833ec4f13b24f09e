// src/db/legacy_repo.rs

//! Leitura do banco compartilhado da versão anterior (antes de cada empresa
//! ter o seu arquivo) e cópia idempotente para o arquivo da empresa.
//!
//! No banco antigo os valores eram `REAL` em reais e o estado era um booleano
//! `active`; aqui eles viram centavos e `Lifecycle`. Os pedidos de mesa não
//! tinham empresa: pertencem à empresa dos produtos que referenciam.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::crm::Customer;
use crate::models::finance::CashClosure;
use crate::models::inventory::Product;
use crate::models::operations::{OrderLine, TableOrder};
use crate::models::sales::{Sale, SaleItem};
use crate::models::staff::Employee;

/// Nome do marcador gravado no arquivo da empresa após a cópia.
pub const LEGACY_MARKER: &str = "legacy_shared_db";

const LEGACY_ORDER_FILTER: &str = r#"
    EXISTS (
        SELECT 1 FROM table_order_items i
        JOIN products p ON p.id = i.product_id
        WHERE i.order_id = o.id AND p.company_id = ?
    )
"#;

#[derive(Clone, Default)]
pub struct LegacyRepository;

impl LegacyRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  LADO ANTIGO (somente leitura)
    // =========================================================================

    pub async fn table_exists(&self, legacy: &SqlitePool, table: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table)
        .fetch_one(legacy)
        .await?;
        Ok(exists)
    }

    pub async fn fetch_products(&self, legacy: &SqlitePool, company_id: i64) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, company_id, name, description, category,
                   CAST(ROUND(price * 100) AS INTEGER) AS price,
                   stock, NULLIF(TRIM(barcode), '') AS barcode,
                   CASE WHEN active THEN 'active' ELSE 'disabled' END AS lifecycle,
                   created_at, updated_at
            FROM products WHERE company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_customers(&self, legacy: &SqlitePool, company_id: i64) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, company_id, name, NULLIF(TRIM(cpf), '') AS cpf, email, phone, address,
                   created_at, updated_at
            FROM customers WHERE company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_employees(&self, legacy: &SqlitePool, company_id: i64) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, company_id, name, role, email, phone, password_hash,
                   CASE WHEN active THEN 'active' ELSE 'disabled' END AS lifecycle,
                   created_at, updated_at
            FROM employees WHERE company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_sales(&self, legacy: &SqlitePool, company_id: i64) -> Result<Vec<Sale>, AppError> {
        let rows = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, company_id, customer_id,
                   NULL AS employee_id, NULL AS table_number,
                   CAST(ROUND(total * 100) AS INTEGER) AS total,
                   CAST(ROUND(COALESCE(discount, 0) * 100) AS INTEGER) AS discount,
                   CASE lower(payment_method)
                       WHEN 'dinheiro' THEN 'cash'
                       WHEN 'cash' THEN 'cash'
                       WHEN 'pix' THEN 'pix'
                       ELSE 'card'
                   END AS payment_method,
                   notes, created_at
            FROM sales WHERE company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    /// Itens das vendas da empresa (no banco antigo os itens não têm empresa).
    pub async fn fetch_sale_items(&self, legacy: &SqlitePool, company_id: i64) -> Result<Vec<SaleItem>, AppError> {
        let rows = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT i.id, s.company_id, i.sale_id, i.product_id, i.quantity,
                   CAST(ROUND(i.unit_price * 100) AS INTEGER) AS unit_price,
                   CAST(ROUND(i.subtotal * 100) AS INTEGER) AS subtotal
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            WHERE s.company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_cash_closures(
        &self,
        legacy: &SqlitePool,
        company_id: i64,
    ) -> Result<Vec<CashClosure>, AppError> {
        let rows = sqlx::query_as::<_, CashClosure>(
            r#"
            SELECT id, company_id, employee_id, opened_at, closed_at,
                   CAST(ROUND(cash * 100) AS INTEGER) AS reported_cash,
                   CAST(ROUND(card * 100) AS INTEGER) AS reported_card,
                   CAST(ROUND(pix * 100) AS INTEGER) AS reported_pix,
                   0 AS expected_cash, 0 AS expected_card, 0 AS expected_pix,
                   CAST(ROUND((cash + card + pix) * 100) AS INTEGER) AS difference,
                   notes
            FROM cash_closures WHERE company_id = ?
            "#,
        )
        .bind(company_id)
        .fetch_all(legacy)
        .await?;
        Ok(rows)
    }

    pub async fn fetch_table_orders(
        &self,
        legacy: &SqlitePool,
        company_id: i64,
    ) -> Result<Vec<TableOrder>, AppError> {
        let sql = format!(
            r#"
            SELECT o.id, ? AS company_id, o.table_number, o.status,
                   CAST(ROUND(o.total * 100) AS INTEGER) AS total,
                   o.customer_name, o.notes, o.created_at, o.updated_at
            FROM table_orders o
            WHERE {LEGACY_ORDER_FILTER}
            "#
        );
        let rows = sqlx::query_as::<_, TableOrder>(&sql)
            .bind(company_id)
            .bind(company_id)
            .fetch_all(legacy)
            .await?;
        Ok(rows)
    }

    pub async fn fetch_table_order_lines(
        &self,
        legacy: &SqlitePool,
        company_id: i64,
    ) -> Result<Vec<OrderLine>, AppError> {
        let sql = format!(
            r#"
            SELECT l.id, ? AS company_id, l.order_id, l.product_id, l.quantity,
                   CAST(ROUND(l.unit_price * 100) AS INTEGER) AS unit_price,
                   CAST(ROUND(l.subtotal * 100) AS INTEGER) AS subtotal,
                   l.notes
            FROM table_order_items l
            WHERE l.order_id IN (SELECT o.id FROM table_orders o WHERE {LEGACY_ORDER_FILTER})
            "#
        );
        let rows = sqlx::query_as::<_, OrderLine>(&sql)
            .bind(company_id)
            .bind(company_id)
            .fetch_all(legacy)
            .await?;
        Ok(rows)
    }

    // =========================================================================
    //  LADO NOVO (insere se ainda não existe, pelo id original)
    // =========================================================================

    pub async fn insert_product<'e, E>(&self, executor: E, row: &Product) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO products (
                id, company_id, name, description, category, price, stock, barcode,
                lifecycle, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.category)
        .bind(row.price)
        .bind(row.stock)
        .bind(&row.barcode)
        .bind(row.lifecycle)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_customer<'e, E>(&self, executor: E, row: &Customer) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO customers (
                id, company_id, name, cpf, email, phone, address, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(&row.name)
        .bind(&row.cpf)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.address)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_employee<'e, E>(&self, executor: E, row: &Employee) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO employees (
                id, company_id, name, role, email, phone, password_hash, lifecycle, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(&row.name)
        .bind(&row.role)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.password_hash)
        .bind(row.lifecycle)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Cliente ou funcionário que não existe mais no arquivo da empresa vira `NULL`.
    pub async fn insert_sale<'e, E>(&self, executor: E, row: &Sale) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO sales (
                id, company_id, customer_id, employee_id, table_number,
                total, discount, payment_method, notes, created_at
            )
            VALUES (
                ?, ?,
                (SELECT id FROM customers WHERE id = ?),
                (SELECT id FROM employees WHERE id = ?),
                ?, ?, ?, ?, ?, ?
            )
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(row.customer_id)
        .bind(row.employee_id)
        .bind(row.table_number)
        .bind(row.total)
        .bind(row.discount)
        .bind(row.payment_method)
        .bind(&row.notes)
        .bind(row.created_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_sale_item<'e, E>(&self, executor: E, row: &SaleItem) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO sale_items (id, company_id, sale_id, product_id, quantity, unit_price, subtotal)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(row.sale_id)
        .bind(row.product_id)
        .bind(row.quantity)
        .bind(row.unit_price)
        .bind(row.subtotal)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_cash_closure<'e, E>(&self, executor: E, row: &CashClosure) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO cash_closures (
                id, company_id, employee_id, opened_at, closed_at,
                reported_cash, reported_card, reported_pix,
                expected_cash, expected_card, expected_pix,
                difference, notes
            )
            VALUES (?, ?, (SELECT id FROM employees WHERE id = ?), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(row.employee_id)
        .bind(row.opened_at)
        .bind(row.closed_at)
        .bind(row.reported_cash)
        .bind(row.reported_card)
        .bind(row.reported_pix)
        .bind(row.expected_cash)
        .bind(row.expected_card)
        .bind(row.expected_pix)
        .bind(row.difference)
        .bind(&row.notes)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_table_order<'e, E>(&self, executor: E, row: &TableOrder) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO table_orders (
                id, company_id, table_number, status, total, customer_name, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(row.table_number)
        .bind(row.status)
        .bind(row.total)
        .bind(&row.customer_name)
        .bind(&row.notes)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_table_order_line<'e, E>(&self, executor: E, row: &OrderLine) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO table_order_items (
                id, company_id, order_id, product_id, quantity, unit_price, subtotal, notes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.id)
        .bind(row.company_id)
        .bind(row.order_id)
        .bind(row.product_id)
        .bind(row.quantity)
        .bind(row.unit_price)
        .bind(row.subtotal)
        .bind(&row.notes)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  MARCADOR
    // =========================================================================

    pub async fn is_marked<'e, E>(&self, executor: E, marker: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM migration_markers WHERE name = ?)")
                .bind(marker)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    pub async fn mark<'e, E>(&self, executor: E, marker: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT OR IGNORE INTO migration_markers (name, applied_at) VALUES (?, ?)")
            .bind(marker)
            .bind(Utc::now())
            .execute(executor)
            .await?;
        Ok(())
    }
}
