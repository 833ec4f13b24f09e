// src/services/sales_service.rs

use std::sync::Arc;

use sqlx::SqliteConnection;

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{
        sales_repo::NewSale, CrmRepository, DashboardRepository, InventoryRepository, SalesRepository,
        StaffRepository, TenantRegistry,
    },
    models::{
        lifecycle::HasLifecycle,
        sales::{CreateSalePayload, PricedLine, Sale, SaleDetail, SalesQuery},
    },
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Checkout direto do PDV.
///
/// Diferente do fechamento de mesa, aqui o estoque é conferido linha a linha:
/// se algum produto não tiver saldo a venda inteira é desfeita.
#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    inventory_repo: InventoryRepository,
    dashboard_repo: DashboardRepository,
    registry: Arc<TenantRegistry>,
}

impl SalesService {
    pub fn new(
        sales_repo: SalesRepository,
        inventory_repo: InventoryRepository,
        dashboard_repo: DashboardRepository,
        registry: Arc<TenantRegistry>,
    ) -> Self {
        Self { sales_repo, inventory_repo, dashboard_repo, registry }
    }

    pub async fn create_sale(&self, company_id: i64, payload: &CreateSalePayload) -> Result<SaleDetail, AppError> {
        if payload.items.is_empty() {
            return Err(AppError::MissingField("items"));
        }

        let store = self.registry.store(company_id).await?;
        let mut tx = store.begin().await?;

        ensure_sale_references(&mut *tx, company_id, payload.customer_id, payload.employee_id).await?;

        // 1. Preço vem do cadastro; baixa de estoque condicionada ao saldo.
        let mut lines = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            let product = self
                .inventory_repo
                .find_product(&mut *tx, company_id, item.product_id)
                .await?
                .filter(|p| p.is_active())
                .ok_or(AppError::NotFound("Produto"))?;

            let affected = self
                .inventory_repo
                .decrement_stock_checked(&mut *tx, company_id, product.id, item.quantity)
                .await?;
            if affected == 0 {
                // Relê o saldo: linhas anteriores da mesma venda podem já ter baixado.
                let available = self
                    .inventory_repo
                    .find_product(&mut *tx, company_id, product.id)
                    .await?
                    .map_or(product.stock, |p| p.stock);
                return Err(AppError::InsufficientStock {
                    product_id: product.id,
                    available,
                    requested: item.quantity,
                });
            }

            lines.push(PricedLine::new(product.id, item.quantity, product.price)?);
        }

        // 2. Totais
        let gross_total = PricedLine::total(&lines)?;
        let net_total = gross_total.saturating_discount(payload.discount);

        // 3. Cabeçalho + itens
        let sale = self
            .sales_repo
            .insert_sale(
                &mut *tx,
                company_id,
                NewSale {
                    customer_id: payload.customer_id,
                    employee_id: payload.employee_id,
                    table_number: None,
                    total: net_total,
                    discount: payload.discount,
                    payment_method: payload.payment_method,
                    notes: blank_to_none(payload.notes.as_deref()),
                },
            )
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            items.push(
                self.sales_repo
                    .insert_sale_item(&mut *tx, company_id, sale.id, line)
                    .await?,
            );
        }

        // 4. Acumulados da empresa
        self.dashboard_repo.record_sale(&mut *tx, company_id, net_total).await?;

        tx.commit().await?;

        tracing::info!(company_id, sale_id = sale.id, total = %net_total, "🧾 Venda registrada");
        Ok(SaleDetail { sale, items })
    }

    pub async fn list_sales(&self, company_id: i64, query: &SalesQuery) -> Result<Vec<Sale>, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = query.offset.unwrap_or(0).max(0);

        let store = self.registry.store(company_id).await?;
        self.sales_repo.list_sales(&store, company_id, limit, offset).await
    }

    pub async fn get_sale(&self, company_id: i64, sale_id: i64) -> Result<SaleDetail, AppError> {
        let store = self.registry.store(company_id).await?;
        let sale = self
            .sales_repo
            .find_sale(&store, company_id, sale_id)
            .await?
            .ok_or(AppError::NotFound("Venda"))?;
        let items = self.sales_repo.list_sale_items(&store, company_id, sale_id).await?;
        Ok(SaleDetail { sale, items })
    }
}

/// Cliente e funcionário informados precisam existir na mesma empresa.
pub(crate) async fn ensure_sale_references(
    conn: &mut SqliteConnection,
    company_id: i64,
    customer_id: Option<i64>,
    employee_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(customer_id) = customer_id {
        CrmRepository::new()
            .find_customer(&mut *conn, company_id, customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;
    }
    if let Some(employee_id) = employee_id {
        StaffRepository::new()
            .find_employee(&mut *conn, company_id, employee_id)
            .await?
            .ok_or(AppError::NotFound("Funcionário"))?;
    }
    Ok(())
}
