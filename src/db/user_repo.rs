// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::common::db_utils::unique_violation;
use crate::common::error::AppError;
use crate::models::auth::{User, UserRole};
use crate::models::lifecycle::Lifecycle;

const USER_COLUMNS: &str = "id, company_id, name, email, password_hash, role, lifecycle, \
                            is_demo, demo_expires_at, created_at, updated_at";

/// Dados de um usuário novo no registro global.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub company_id: i64,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub demo_expires_at: Option<DateTime<Utc>>,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email<'e, E>(&self, executor: E, email: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário. E-mail duplicado vira Conflict("email").
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (company_id, name, email, password_hash, role, lifecycle, \
                                is_demo, demo_expires_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 'active', ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(new_user.company_id)
            .bind(new_user.name.trim())
            .bind(new_user.email.trim().to_lowercase())
            .bind(new_user.password_hash)
            .bind(new_user.role)
            .bind(new_user.demo_expires_at.is_some())
            .bind(new_user.demo_expires_at)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
            .map_err(unique_violation("email"))
    }

    pub async fn list_by_company<'e, E>(&self, executor: E, company_id: i64) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE company_id = ? ORDER BY name ASC");
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(company_id)
            .fetch_all(executor)
            .await?;
        Ok(users)
    }

    /// Desativa/reativa. Retorna `false` se o usuário não pertence à empresa.
    pub async fn set_lifecycle<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        user_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET lifecycle = ?, updated_at = ? WHERE id = ? AND company_id = ?",
        )
        .bind(lifecycle)
        .bind(Utc::now())
        .bind(user_id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND company_id = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(user_id)
        .bind(company_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
