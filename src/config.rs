// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    db::{
        store::open_global_store, CrmRepository, DashboardRepository, FinanceRepository, InventoryRepository,
        LegacyRepository, OperationsRepository, SalesRepository, StaffRepository, TenantRegistry, TenantRepository,
        UserRepository,
    },
    services::{
        auth::AuthService, crm_service::CrmService, dashboard_service::DashboardService,
        finance_service::FinanceService, inventory_service::InventoryService, migration_service::MigrationService,
        operation_service::OperationService, sales_service::SalesService, staff_service::StaffService,
        tenancy_service::TenantService,
    },
};

const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;
const DEFAULT_DEMO_DAYS: i64 = 7;

/// Configuração lida do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub demo_days: i64,
    pub tenant_pool_size: u32,
    pub legacy_db_path: Option<PathBuf>,
    pub master_email: Option<String>,
    pub master_password: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // O .env é opcional: em produção as variáveis vêm do ambiente.
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()).into(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?,
            demo_days: parse_var("DEMO_DAYS", DEFAULT_DEMO_DAYS)?,
            tenant_pool_size: parse_var("TENANT_POOL_SIZE", 1)?,
            legacy_db_path: optional_var("LEGACY_DB_PATH").map(PathBuf::from),
            master_email: optional_var("MASTER_EMAIL"),
            master_password: optional_var("MASTER_PASSWORD"),
        })
    }

    /// Configuração mínima para testes: tudo dentro de `data_dir`.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>, jwt_secret: &str) -> Self {
        Self {
            data_dir: data_dir.into(),
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            demo_days: DEFAULT_DEMO_DAYS,
            tenant_pool_size: 1,
            legacy_db_path: None,
            master_email: None,
            master_password: None,
        }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: {raw}")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: SqlitePool,
    pub registry: Arc<TenantRegistry>,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub staff_service: StaffService,
    pub sales_service: SalesService,
    pub operation_service: OperationService,
    pub finance_service: FinanceService,
    pub dashboard_service: DashboardService,
    pub migration_service: MigrationService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = open_global_store(&config.data_dir)
            .await
            .context("Falha ao abrir o registro global")?;

        let registry = Arc::new(TenantRegistry::new(config.data_dir.clone(), config.tenant_pool_size));
        Ok(Self::from_parts(config, db_pool, registry))
    }

    /// Monta o gráfico de dependências sobre pools já abertos.
    pub fn from_parts(config: Config, db_pool: SqlitePool, registry: Arc<TenantRegistry>) -> Self {
        let auth_service = AuthService::new(
            UserRepository::new(),
            TenantRepository::new(),
            db_pool.clone(),
            registry.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_hours,
            config.demo_days,
        );
        let tenant_service = TenantService::new(
            TenantRepository::new(),
            UserRepository::new(),
            DashboardRepository::new(),
            db_pool.clone(),
            registry.clone(),
        );
        let inventory_service = InventoryService::new(InventoryRepository::new(), registry.clone());
        let crm_service = CrmService::new(CrmRepository::new(), registry.clone());
        let staff_service = StaffService::new(StaffRepository::new(), registry.clone());
        let sales_service = SalesService::new(
            SalesRepository::new(),
            InventoryRepository::new(),
            DashboardRepository::new(),
            registry.clone(),
        );
        let operation_service = OperationService::new(
            OperationsRepository::new(),
            InventoryRepository::new(),
            SalesRepository::new(),
            DashboardRepository::new(),
            registry.clone(),
        );
        let finance_service = FinanceService::new(FinanceRepository::new(), SalesRepository::new(), registry.clone());
        let dashboard_service = DashboardService::new(
            DashboardRepository::new(),
            SalesRepository::new(),
            InventoryRepository::new(),
            OperationsRepository::new(),
            registry.clone(),
        );
        let migration_service = MigrationService::new(
            LegacyRepository::new(),
            TenantRepository::new(),
            DashboardRepository::new(),
            db_pool.clone(),
            registry.clone(),
        );

        Self {
            config: Arc::new(config),
            db_pool,
            registry,
            auth_service,
            tenant_service,
            inventory_service,
            crm_service,
            staff_service,
            sales_service,
            operation_service,
            finance_service,
            dashboard_service,
            migration_service,
        }
    }
}
