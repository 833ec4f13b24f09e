// src/services/migration_service.rs

//! Cópia única dos dados da versão antiga (banco compartilhado) para o
//! arquivo de cada empresa. Roda só na inicialização.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{legacy_repo::LEGACY_MARKER, DashboardRepository, LegacyRepository, TenantRegistry, TenantRepository},
};

/// Quantas linhas foram inseridas em cada tabela para uma empresa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub company_id: i64,
    /// A empresa já tinha o marcador: nada foi lido nem gravado.
    pub already_migrated: bool,
    pub products: u64,
    pub customers: u64,
    pub employees: u64,
    pub sales: u64,
    pub sale_items: u64,
    pub cash_closures: u64,
    pub table_orders: u64,
    pub table_order_lines: u64,
}

impl MigrationReport {
    pub fn inserted(&self) -> u64 {
        self.products
            + self.customers
            + self.employees
            + self.sales
            + self.sale_items
            + self.cash_closures
            + self.table_orders
            + self.table_order_lines
    }
}

/// Abre o banco antigo somente para leitura. `None` se o arquivo não existe.
pub async fn open_legacy_store(path: &Path) -> Result<Option<SqlitePool>, AppError> {
    if !path.exists() {
        tracing::info!("Banco antigo não encontrado em {}, nada a migrar", path.display());
        return Ok(None);
    }

    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;
    Ok(Some(pool))
}

#[derive(Clone)]
pub struct MigrationService {
    legacy_repo: LegacyRepository,
    tenant_repo: TenantRepository,
    dashboard_repo: DashboardRepository,
    pool: SqlitePool,
    registry: Arc<TenantRegistry>,
}

impl MigrationService {
    pub fn new(
        legacy_repo: LegacyRepository,
        tenant_repo: TenantRepository,
        dashboard_repo: DashboardRepository,
        pool: SqlitePool,
        registry: Arc<TenantRegistry>,
    ) -> Self {
        Self { legacy_repo, tenant_repo, dashboard_repo, pool, registry }
    }

    /// Migra todas as empresas ativas. A falha de uma empresa é logada e não
    /// interrompe as outras nem a inicialização; sem o marcador, ela será
    /// tentada de novo no próximo start.
    pub async fn run(&self, legacy: &SqlitePool) -> Result<Vec<MigrationReport>, AppError> {
        let company_ids = self.tenant_repo.list_active_company_ids(&self.pool).await?;

        let mut reports = Vec::with_capacity(company_ids.len());
        for company_id in company_ids {
            match self.migrate_company(legacy, company_id).await {
                Ok(report) => {
                    if !report.already_migrated {
                        tracing::info!(company_id, inserted = report.inserted(), "📥 Dados antigos migrados");
                    }
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!(company_id, "🔥 Falha ao migrar dados antigos: {}", e);
                }
            }
        }
        Ok(reports)
    }

    pub async fn migrate_company(&self, legacy: &SqlitePool, company_id: i64) -> Result<MigrationReport, AppError> {
        let store = self.registry.store(company_id).await?;
        let mut report = MigrationReport { company_id, ..Default::default() };

        if self.legacy_repo.is_marked(&store, LEGACY_MARKER).await? {
            report.already_migrated = true;
            return Ok(report);
        }

        // 1. Lê tudo do banco antigo antes de abrir a transação.
        let repo = &self.legacy_repo;
        let products = if repo.table_exists(legacy, "products").await? {
            repo.fetch_products(legacy, company_id).await?
        } else {
            Vec::new()
        };
        let customers = if repo.table_exists(legacy, "customers").await? {
            repo.fetch_customers(legacy, company_id).await?
        } else {
            Vec::new()
        };
        let employees = if repo.table_exists(legacy, "employees").await? {
            repo.fetch_employees(legacy, company_id).await?
        } else {
            Vec::new()
        };
        let (sales, sale_items) = if repo.table_exists(legacy, "sales").await? {
            let items = if repo.table_exists(legacy, "sale_items").await? {
                repo.fetch_sale_items(legacy, company_id).await?
            } else {
                Vec::new()
            };
            (repo.fetch_sales(legacy, company_id).await?, items)
        } else {
            (Vec::new(), Vec::new())
        };
        let cash_closures = if repo.table_exists(legacy, "cash_closures").await? {
            repo.fetch_cash_closures(legacy, company_id).await?
        } else {
            Vec::new()
        };
        // Pedidos de mesa só existiam nas versões mais novas do banco antigo.
        let has_orders = repo.table_exists(legacy, "table_orders").await?
            && repo.table_exists(legacy, "table_order_items").await?
            && repo.table_exists(legacy, "products").await?;
        let (orders, order_lines) = if has_orders {
            (
                repo.fetch_table_orders(legacy, company_id).await?,
                repo.fetch_table_order_lines(legacy, company_id).await?,
            )
        } else {
            (Vec::new(), Vec::new())
        };

        // 2. Grava tudo numa transação, com o marcador junto.
        let mut tx = store.begin().await?;

        for row in &products {
            report.products += repo.insert_product(&mut *tx, row).await?;
        }
        for row in &customers {
            report.customers += repo.insert_customer(&mut *tx, row).await?;
        }
        for row in &employees {
            report.employees += repo.insert_employee(&mut *tx, row).await?;
        }
        for row in &sales {
            let inserted = repo.insert_sale(&mut *tx, row).await?;
            // Vendas antigas entram nos acumulados uma única vez.
            if inserted > 0 {
                self.dashboard_repo.record_sale(&mut *tx, company_id, row.total).await?;
            }
            report.sales += inserted;
        }
        for row in &sale_items {
            report.sale_items += repo.insert_sale_item(&mut *tx, row).await?;
        }
        for row in &cash_closures {
            report.cash_closures += repo.insert_cash_closure(&mut *tx, row).await?;
        }
        for row in &orders {
            report.table_orders += repo.insert_table_order(&mut *tx, row).await?;
        }
        for row in &order_lines {
            report.table_order_lines += repo.insert_table_order_line(&mut *tx, row).await?;
        }

        repo.mark(&mut *tx, LEGACY_MARKER).await?;
        tx.commit().await?;

        Ok(report)
    }
}
