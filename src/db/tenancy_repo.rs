// src/db/tenancy_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::common::db_utils::unique_violation;
use crate::common::error::AppError;
use crate::common::money::Money;
use crate::models::lifecycle::Lifecycle;
use crate::models::tenancy::{Company, Plan};

const COMPANY_COLUMNS: &str =
    "id, name, document, email, phone, plan_id, lifecycle, is_demo, created_at, updated_at";

/// Registro global de empresas e planos.
#[derive(Clone, Default)]
pub struct TenantRepository;

impl TenantRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    /// Cria uma nova empresa no registro global.
    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        name: &str,
        document: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        plan_id: Option<i64>,
        is_demo: bool,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO companies (name, document, email, phone, plan_id, lifecycle, is_demo, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 'active', ?, ?, ?) \
             RETURNING {COMPANY_COLUMNS}"
        );

        sqlx::query_as::<_, Company>(&sql)
            .bind(name.trim())
            .bind(document)
            .bind(email)
            .bind(phone)
            .bind(plan_id)
            .bind(is_demo)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
            .map_err(unique_violation("document"))
    }

    pub async fn find_company<'e, E>(&self, executor: E, company_id: i64) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(company_id)
            .fetch_optional(executor)
            .await?;
        Ok(company)
    }

    pub async fn find_company_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE name = ? LIMIT 1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(company)
    }

    pub async fn list_companies<'e, E>(&self, executor: E) -> Result<Vec<Company>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY id ASC");
        let companies = sqlx::query_as::<_, Company>(&sql).fetch_all(executor).await?;
        Ok(companies)
    }

    pub async fn list_active_company_ids<'e, E>(&self, executor: E) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM companies WHERE lifecycle = 'active' ORDER BY id ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    /// Atualização parcial: campos `None` mantêm o valor atual.
    pub async fn update_company<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        name: Option<&str>,
        document: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        plan_id: Option<i64>,
    ) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "UPDATE companies SET \
                name = COALESCE(?, name), \
                document = COALESCE(?, document), \
                email = COALESCE(?, email), \
                phone = COALESCE(?, phone), \
                plan_id = COALESCE(?, plan_id), \
                updated_at = ? \
             WHERE id = ? \
             RETURNING {COMPANY_COLUMNS}"
        );

        sqlx::query_as::<_, Company>(&sql)
            .bind(name)
            .bind(document)
            .bind(email)
            .bind(phone)
            .bind(plan_id)
            .bind(Utc::now())
            .bind(company_id)
            .fetch_optional(executor)
            .await
            .map_err(unique_violation("document"))
    }

    pub async fn set_company_lifecycle<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE companies SET lifecycle = ?, updated_at = ? WHERE id = ?")
            .bind(lifecycle)
            .bind(Utc::now())
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        name: &str,
        price: Money,
        max_users: Option<i64>,
        max_products: Option<i64>,
    ) -> Result<Plan, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (name, price, max_users, max_products, lifecycle, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'active', ?, ?)
            RETURNING *
            "#,
        )
        .bind(name.trim())
        .bind(price)
        .bind(max_users)
        .bind(max_products)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(unique_violation("name"))
    }

    pub async fn list_plans<'e, E>(&self, executor: E) -> Result<Vec<Plan>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY price ASC, id ASC")
            .fetch_all(executor)
            .await?;
        Ok(plans)
    }

    pub async fn find_plan<'e, E>(&self, executor: E, plan_id: i64) -> Result<Option<Plan>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plan = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = ?")
            .bind(plan_id)
            .fetch_optional(executor)
            .await?;
        Ok(plan)
    }

    pub async fn update_plan<'e, E>(
        &self,
        executor: E,
        plan_id: i64,
        name: Option<&str>,
        price: Option<Money>,
        max_users: Option<i64>,
        max_products: Option<i64>,
    ) -> Result<Option<Plan>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Plan>(
            r#"
            UPDATE plans SET
                name = COALESCE(?, name),
                price = COALESCE(?, price),
                max_users = COALESCE(?, max_users),
                max_products = COALESCE(?, max_products),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(max_users)
        .bind(max_products)
        .bind(Utc::now())
        .bind(plan_id)
        .fetch_optional(executor)
        .await
        .map_err(unique_violation("name"))
    }

    pub async fn set_plan_lifecycle<'e, E>(
        &self,
        executor: E,
        plan_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE plans SET lifecycle = ?, updated_at = ? WHERE id = ?")
            .bind(lifecycle)
            .bind(Utc::now())
            .bind(plan_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
