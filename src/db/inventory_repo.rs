// src/db/inventory_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::common::db_utils::unique_violation;
use crate::common::error::AppError;
use crate::common::money::Money;
use crate::models::inventory::Product;
use crate::models::lifecycle::Lifecycle;

/// Produtos do arquivo de uma empresa. Toda consulta filtra por `company_id`.
#[derive(Clone, Default)]
pub struct InventoryRepository;

impl InventoryRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        name: &str,
        description: Option<&str>,
        category: Option<&str>,
        price: Money,
        stock: i64,
        barcode: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                company_id, name, description, category, price, stock, barcode,
                lifecycle, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name.trim())
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(barcode)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(unique_violation("barcode"))
    }

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        include_disabled: bool,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE company_id = ? AND (? OR lifecycle = 'active')
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .bind(include_disabled)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn find_product<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE company_id = ? AND id = ?",
        )
        .bind(company_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn find_by_barcode<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        barcode: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE company_id = ? AND barcode = ?",
        )
        .bind(company_id)
        .bind(barcode.trim())
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
        name: Option<&str>,
        description: Option<&str>,
        category: Option<&str>,
        price: Option<Money>,
        stock: Option<i64>,
        barcode: Option<&str>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                price = COALESCE(?, price),
                stock = COALESCE(?, stock),
                barcode = COALESCE(?, barcode),
                updated_at = ?
            WHERE company_id = ? AND id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(barcode)
        .bind(Utc::now())
        .bind(company_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await
        .map_err(unique_violation("barcode"))
    }

    pub async fn set_lifecycle<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE products SET lifecycle = ?, updated_at = ? WHERE company_id = ? AND id = ?",
        )
        .bind(lifecycle)
        .bind(Utc::now())
        .bind(company_id)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soma `delta` ao estoque (ajuste manual). Não deixa o estoque negativo.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
        delta: i64,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET stock = stock + ?, updated_at = ?
            WHERE company_id = ? AND id = ? AND stock + ? >= 0
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(Utc::now())
        .bind(company_id)
        .bind(product_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Baixa de estoque sem checagem de saldo (fechamento de mesa).
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE products SET stock = stock - ?, updated_at = ? WHERE company_id = ? AND id = ?",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(company_id)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Baixa de estoque condicionada a haver saldo (checkout direto).
    /// Retorna 0 linhas afetadas quando o saldo não cobre a quantidade.
    pub async fn decrement_stock_checked<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products SET stock = stock - ?, updated_at = ?
            WHERE company_id = ? AND id = ? AND stock >= ?
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(company_id)
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_low_stock<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        threshold: i64,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE company_id = ? AND lifecycle = 'active' AND stock <= ?",
        )
        .bind(company_id)
        .bind(threshold)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }
}
