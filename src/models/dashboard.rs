// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::money::Money;

/// Acumulados da empresa, mantidos na mesma transação de cada venda.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTotals {
    pub total_sales: Money,
    pub sales_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: Money,
    pub sales_count: i64,
    pub today_revenue: Money,
    pub today_sales_count: i64,
    pub open_tables: i64,
    pub low_stock_products: i64,
    pub pending_staff_calls: i64,
}
