// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{NaiveTime, Utc};

use crate::{
    common::error::AppError,
    db::{DashboardRepository, InventoryRepository, OperationsRepository, SalesRepository, TenantRegistry},
    models::dashboard::{CompanyTotals, DashboardSummary},
};

/// Produtos com estoque igual ou abaixo disso aparecem como alerta.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    sales_repo: SalesRepository,
    inventory_repo: InventoryRepository,
    ops_repo: OperationsRepository,
    registry: Arc<TenantRegistry>,
}

impl DashboardService {
    pub fn new(
        repo: DashboardRepository,
        sales_repo: SalesRepository,
        inventory_repo: InventoryRepository,
        ops_repo: OperationsRepository,
        registry: Arc<TenantRegistry>,
    ) -> Self {
        Self { repo, sales_repo, inventory_repo, ops_repo, registry }
    }

    pub async fn get_totals(&self, company_id: i64) -> Result<CompanyTotals, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo.get_totals(&store, company_id).await
    }

    pub async fn get_summary(&self, company_id: i64) -> Result<DashboardSummary, AppError> {
        let store = self.registry.store(company_id).await?;

        let totals = self.repo.get_totals(&store, company_id).await?;

        // "Hoje" em UTC.
        let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let (today_revenue, today_sales_count) = self
            .sales_repo
            .revenue_since(&store, company_id, start_of_day)
            .await?;

        let open_tables = self.ops_repo.count_open_tables(&store, company_id).await?;
        let low_stock_products = self
            .inventory_repo
            .count_low_stock(&store, company_id, LOW_STOCK_THRESHOLD)
            .await?;
        let pending_staff_calls = self.ops_repo.list_pending_calls(&store, company_id).await?.len() as i64;

        Ok(DashboardSummary {
            total_sales: totals.total_sales,
            sales_count: totals.sales_count,
            today_revenue,
            today_sales_count,
            open_tables,
            low_stock_products,
            pending_staff_calls,
        })
    }
}
