// src/db/crm_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::common::db_utils::unique_violation;
use crate::common::error::AppError;
use crate::models::crm::Customer;

#[derive(Clone, Default)]
pub struct CrmRepository;

impl CrmRepository {
    pub fn new() -> Self {
        Self
    }

    /// Cria um cliente. CPF repetido na mesma empresa vira Conflict("cpf").
    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        name: &str,
        cpf: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (company_id, name, cpf, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name.trim())
        .bind(cpf)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(unique_violation("cpf"))
    }

    pub async fn list_customers<'e, E>(&self, executor: E, company_id: i64) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE company_id = ? ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(customers)
    }

    pub async fn find_customer<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        customer_id: i64,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE company_id = ? AND id = ?",
        )
        .bind(company_id)
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        customer_id: i64,
        name: Option<&str>,
        cpf: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = COALESCE(?, name),
                cpf = COALESCE(?, cpf),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                updated_at = ?
            WHERE company_id = ? AND id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(cpf)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(Utc::now())
        .bind(company_id)
        .bind(customer_id)
        .fetch_optional(executor)
        .await
        .map_err(unique_violation("cpf"))
    }

    pub async fn delete_customer<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        customer_id: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE company_id = ? AND id = ?")
            .bind(company_id)
            .bind(customer_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
