// src/services/tenancy_service.rs

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{user_repo::NewUser, DashboardRepository, TenantRegistry, TenantRepository, UserRepository},
    models::{
        auth::UserRole,
        lifecycle::Lifecycle,
        tenancy::{
            Company, CompanyOverview, CreateCompanyPayload, CreatePlanPayload, Plan, ProvisionedCompany,
            UpdateCompanyPayload, UpdatePlanPayload,
        },
    },
    services::auth::hash_password,
};

/// Painel master: planos e empresas do registro global.
#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    user_repo: UserRepository,
    dashboard_repo: DashboardRepository,
    pool: SqlitePool, // Usamos a pool para iniciar transações
    registry: Arc<TenantRegistry>,
}

impl TenantService {
    pub fn new(
        tenant_repo: TenantRepository,
        user_repo: UserRepository,
        dashboard_repo: DashboardRepository,
        pool: SqlitePool,
        registry: Arc<TenantRegistry>,
    ) -> Self {
        Self { tenant_repo, user_repo, dashboard_repo, pool, registry }
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn create_plan(&self, payload: &CreatePlanPayload) -> Result<Plan, AppError> {
        self.tenant_repo
            .create_plan(&self.pool, payload.name.trim(), payload.price, payload.max_users, payload.max_products)
            .await
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, AppError> {
        self.tenant_repo.list_plans(&self.pool).await
    }

    pub async fn update_plan(&self, plan_id: i64, payload: &UpdatePlanPayload) -> Result<Plan, AppError> {
        self.tenant_repo
            .update_plan(
                &self.pool,
                plan_id,
                blank_to_none(payload.name.as_deref()),
                payload.price,
                payload.max_users,
                payload.max_products,
            )
            .await?
            .ok_or(AppError::NotFound("Plano"))
    }

    pub async fn set_plan_lifecycle(&self, plan_id: i64, lifecycle: Lifecycle) -> Result<(), AppError> {
        if !self.tenant_repo.set_plan_lifecycle(&self.pool, plan_id, lifecycle).await? {
            return Err(AppError::NotFound("Plano"));
        }
        Ok(())
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    /// LÓGICA DE NEGÓCIO: cria a empresa e o seu primeiro administrador na
    /// mesma transação do registro global e, em seguida, o arquivo da empresa.
    pub async fn provision_company(&self, payload: &CreateCompanyPayload) -> Result<ProvisionedCompany, AppError> {
        if let Some(plan_id) = payload.plan_id {
            self.ensure_plan_exists(plan_id).await?;
        }

        let hashed_password = hash_password(&payload.admin_password).await?;

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a empresa
        let company = self
            .tenant_repo
            .create_company(
                &mut *tx,
                payload.name.trim(),
                blank_to_none(payload.document.as_deref()),
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                payload.plan_id,
                false,
            )
            .await?;

        // 3. Cria o administrador
        let admin = self
            .user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    company_id: company.id,
                    name: &payload.admin_name,
                    email: &payload.admin_email,
                    password_hash: &hashed_password,
                    role: UserRole::Admin,
                    demo_expires_at: None,
                },
            )
            .await?;

        // 4. Commit
        tx.commit().await?;

        // 5. Arquivo da empresa (idempotente; se falhar, a primeira requisição cria)
        self.registry.store(company.id).await?;

        tracing::info!(company_id = company.id, "🏢 Empresa provisionada: {}", company.name);
        Ok(ProvisionedCompany { company, admin_user_id: admin.id })
    }

    /// Lista todas as empresas com os acumulados lidos do arquivo de cada uma.
    pub async fn list_companies(&self) -> Result<Vec<CompanyOverview>, AppError> {
        let companies = self.tenant_repo.list_companies(&self.pool).await?;

        let mut overviews = Vec::with_capacity(companies.len());
        for company in companies {
            overviews.push(self.overview(company).await?);
        }
        Ok(overviews)
    }

    pub async fn get_company(&self, company_id: i64) -> Result<CompanyOverview, AppError> {
        let company = self
            .tenant_repo
            .find_company(&self.pool, company_id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;
        self.overview(company).await
    }

    async fn overview(&self, company: Company) -> Result<CompanyOverview, AppError> {
        let store = self.registry.store(company.id).await?;
        let totals = self.dashboard_repo.get_totals(&store, company.id).await?;
        Ok(CompanyOverview {
            company,
            total_sales: totals.total_sales,
            sales_count: totals.sales_count,
        })
    }

    pub async fn update_company(&self, company_id: i64, payload: &UpdateCompanyPayload) -> Result<Company, AppError> {
        if let Some(plan_id) = payload.plan_id {
            self.ensure_plan_exists(plan_id).await?;
        }

        self.tenant_repo
            .update_company(
                &self.pool,
                company_id,
                blank_to_none(payload.name.as_deref()),
                blank_to_none(payload.document.as_deref()),
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                payload.plan_id,
            )
            .await?
            .ok_or(AppError::NotFound("Empresa"))
    }

    /// Desativar bloqueia o login e todo token já emitido da empresa.
    pub async fn set_company_lifecycle(&self, company_id: i64, lifecycle: Lifecycle) -> Result<(), AppError> {
        if !self.tenant_repo.set_company_lifecycle(&self.pool, company_id, lifecycle).await? {
            return Err(AppError::NotFound("Empresa"));
        }
        tracing::info!(company_id, ?lifecycle, "Estado da empresa alterado");
        Ok(())
    }

    /// Empresa existente e ativa (usado pelas rotas públicas de QR code).
    pub async fn require_active_company(&self, company_id: i64) -> Result<Company, AppError> {
        let company = self
            .tenant_repo
            .find_company(&self.pool, company_id)
            .await?
            .filter(|c| c.lifecycle.is_active())
            .ok_or(AppError::NotFound("Empresa"))?;
        Ok(company)
    }

    async fn ensure_plan_exists(&self, plan_id: i64) -> Result<(), AppError> {
        self.tenant_repo
            .find_plan(&self.pool, plan_id)
            .await?
            .filter(|p| p.lifecycle.is_active())
            .ok_or(AppError::NotFound("Plano"))?;
        Ok(())
    }
}
