// src/db/staff_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::common::error::AppError;
use crate::models::lifecycle::Lifecycle;
use crate::models::staff::Employee;

#[derive(Clone, Default)]
pub struct StaffRepository;

impl StaffRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_employee<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        name: &str,
        role: &str,
        email: Option<&str>,
        phone: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                company_id, name, role, email, phone, password_hash, lifecycle, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, 'active', ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(name.trim())
        .bind(role.trim())
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(employee)
    }

    pub async fn list_employees<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        include_disabled: bool,
    ) -> Result<Vec<Employee>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE company_id = ? AND (? OR lifecycle = 'active')
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .bind(include_disabled)
        .fetch_all(executor)
        .await?;
        Ok(employees)
    }

    pub async fn find_employee<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        employee_id: i64,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE company_id = ? AND id = ?",
        )
        .bind(company_id)
        .bind(employee_id)
        .fetch_optional(executor)
        .await?;
        Ok(employee)
    }

    pub async fn update_employee<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        employee_id: i64,
        name: Option<&str>,
        role: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name = COALESCE(?, name),
                role = COALESCE(?, role),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE company_id = ? AND id = ?
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(role)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(Utc::now())
        .bind(company_id)
        .bind(employee_id)
        .fetch_optional(executor)
        .await?;
        Ok(employee)
    }

    pub async fn set_lifecycle<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        employee_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE employees SET lifecycle = ?, updated_at = ? WHERE company_id = ? AND id = ?",
        )
        .bind(lifecycle)
        .bind(Utc::now())
        .bind(company_id)
        .bind(employee_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
