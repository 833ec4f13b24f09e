// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, TenantRegistry, TenantRepository, UserRepository},
    models::{
        auth::{AuthContext, AuthResponse, Claims, CreateUserPayload, DemoSignupPayload, User, UserRole},
        lifecycle::{HasLifecycle, Lifecycle},
    },
};

/// Nome da empresa "dona" do usuário master.
pub const PLATFORM_COMPANY_NAME: &str = "Plataforma";

/// Gera o hash bcrypt fora do executor assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    pool: SqlitePool,
    registry: Arc<TenantRegistry>,
    jwt_secret: String,
    token_ttl: Duration,
    demo_period: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        pool: SqlitePool,
        registry: Arc<TenantRegistry>,
        jwt_secret: String,
        token_ttl_hours: i64,
        demo_days: i64,
    ) -> Self {
        Self {
            user_repo,
            tenant_repo,
            pool,
            registry,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
            demo_period: Duration::days(demo_days),
        }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.check_account(&user).await?;

        let token = self.create_token(&user)?;
        tracing::info!(user_id = user.id, company_id = user.company_id, "🔑 Login efetuado");
        Ok(AuthResponse { token, user })
    }

    /// Resolve o token no contexto da requisição.
    ///
    /// Refaz todas as checagens a cada chamada: um usuário ou empresa
    /// desativados depois da emissão do token perdem o acesso na hora.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AppError> {
        let claims = self.decode_token(token)?;

        let user = self
            .user_repo
            .find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Token emitido para outra empresa (usuário movido de empresa).
        if user.company_id != claims.company_id {
            return Err(AppError::Unauthorized);
        }

        self.check_account(&user).await?;

        Ok(AuthContext {
            user_id: user.id,
            company_id: user.company_id,
            role: user.role,
            demo_expires_at: user.demo_expires_at,
        })
    }

    /// Usuário ativo, empresa ativa e demonstração dentro do prazo.
    async fn check_account(&self, user: &User) -> Result<(), AppError> {
        if !user.is_active() {
            return Err(AppError::Unauthorized);
        }

        if user.demo_expired_at(Utc::now()) {
            return Err(AppError::DemoExpired);
        }

        let company = self
            .tenant_repo
            .find_company(&self.pool, user.company_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !company.is_active() {
            tracing::warn!(company_id = company.id, "Acesso negado: empresa desativada");
            return Err(AppError::Unauthorized);
        }

        Ok(())
    }

    /// Cria empresa de demonstração + administrador com prazo de expiração.
    pub async fn demo_signup(&self, payload: &DemoSignupPayload) -> Result<AuthResponse, AppError> {
        let hashed_password = hash_password(&payload.password).await?;
        let expires_at = Utc::now() + self.demo_period;

        let mut tx = self.pool.begin().await?;

        let company = self
            .tenant_repo
            .create_company(&mut *tx, &payload.company_name, None, Some(&payload.email), None, None, true)
            .await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    company_id: company.id,
                    name: &payload.name,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    role: UserRole::Admin,
                    demo_expires_at: Some(expires_at),
                },
            )
            .await?;

        tx.commit().await?;

        // Cria o arquivo da empresa já no cadastro, não na primeira requisição.
        self.registry.store(company.id).await?;

        tracing::info!(company_id = company.id, %expires_at, "🧪 Conta de demonstração criada");
        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    // =========================================================================
    //  ADMINISTRAÇÃO DE USUÁRIOS
    // =========================================================================

    pub async fn create_user(
        &self,
        caller: &AuthContext,
        payload: &CreateUserPayload,
    ) -> Result<User, AppError> {
        let role = payload.role.unwrap_or(UserRole::Operator);
        if role == UserRole::Master && caller.role != UserRole::Master {
            return Err(AppError::Forbidden);
        }

        let hashed_password = hash_password(&payload.password).await?;
        self.user_repo
            .create_user(
                &self.pool,
                NewUser {
                    company_id: caller.company_id,
                    name: &payload.name,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    role,
                    demo_expires_at: None,
                },
            )
            .await
    }

    pub async fn list_users(&self, company_id: i64) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_company(&self.pool, company_id).await
    }

    pub async fn set_user_lifecycle(
        &self,
        caller: &AuthContext,
        user_id: i64,
        lifecycle: Lifecycle,
    ) -> Result<(), AppError> {
        // Ninguém desativa a própria conta (e se tranca para fora).
        if user_id == caller.user_id && !lifecycle.is_active() {
            return Err(AppError::Forbidden);
        }

        let updated = self
            .user_repo
            .set_lifecycle(&self.pool, caller.company_id, user_id, lifecycle)
            .await?;
        if !updated {
            return Err(AppError::NotFound("Usuário"));
        }
        Ok(())
    }

    pub async fn change_password(&self, company_id: i64, user_id: i64, password: &str) -> Result<(), AppError> {
        let hashed_password = hash_password(password).await?;
        let updated = self
            .user_repo
            .update_password(&self.pool, company_id, user_id, &hashed_password)
            .await?;
        if !updated {
            return Err(AppError::NotFound("Usuário"));
        }
        Ok(())
    }

    /// Garante o usuário master configurado no ambiente. Não faz nada se ele já existir.
    pub async fn ensure_master(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(&self.pool, email).await?.is_some() {
            return Ok(());
        }

        let hashed_password = hash_password(password).await?;
        let mut tx = self.pool.begin().await?;

        let company = match self
            .tenant_repo
            .find_company_by_name(&mut *tx, PLATFORM_COMPANY_NAME)
            .await?
        {
            Some(company) => company,
            None => {
                self.tenant_repo
                    .create_company(&mut *tx, PLATFORM_COMPANY_NAME, None, None, None, None, false)
                    .await?
            }
        };

        self.user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    company_id: company.id,
                    name: "Master",
                    email,
                    password_hash: &hashed_password,
                    role: UserRole::Master,
                    demo_expires_at: None,
                },
            )
            .await?;

        tx.commit().await?;
        tracing::info!("👑 Usuário master criado: {}", email);
        Ok(())
    }

    // =========================================================================
    //  TOKEN
    // =========================================================================

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            company_id: user.company_id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Assinatura inválida, token expirado ou malformado: tudo vira `Unauthorized`.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::Unauthorized
        })?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 9,
            company_id: 3,
            name: "Ana".into(),
            email: "ana@loja.com".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            lifecycle: Lifecycle::Active,
            is_demo: false,
            demo_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn service(secret: &str, ttl_hours: i64) -> AuthService {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        AuthService::new(
            UserRepository::new(),
            TenantRepository::new(),
            pool,
            Arc::new(TenantRegistry::new("/tmp/unused", 1)),
            secret.into(),
            ttl_hours,
            7,
        )
    }

    #[tokio::test]
    async fn token_carries_user_and_company() {
        let svc = service("segredo", 1).await;
        let token = svc.create_token(&sample_user()).unwrap();
        let claims = svc.decode_token(&token).unwrap();
        assert_eq!(claims.sub, 9);
        assert_eq!(claims.company_id, 3);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let issuer = service("segredo-a", 1).await;
        let verifier = service("segredo-b", 1).await;
        let token = issuer.create_token(&sample_user()).unwrap();
        assert!(matches!(verifier.decode_token(&token), Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        // TTL negativo: já nasce expirado (além da folga padrão de 60s).
        let svc = service("segredo", -2).await;
        let token = svc.create_token(&sample_user()).unwrap();
        assert!(matches!(svc.decode_token(&token), Err(AppError::Unauthorized)));
    }
}
