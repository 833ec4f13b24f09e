// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::sales::{CreateSalePayload, Sale, SaleDetail, SalesQuery},
};

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Vendas",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada", body = SaleDetail),
        (status = 404, description = "Produto, cliente ou funcionário inexistente"),
        (status = 400, description = "Estoque insuficiente; nada foi gravado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let sale = app_state.sales_service.create_sale(tenant.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Vendas",
    params(SalesQuery),
    responses((status = 200, description = "Vendas, mais recentes primeiro", body = Vec<Sale>)),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales(tenant.0, &query).await?;
    Ok(Json(sales))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Vendas",
    params(("id" = i64, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com itens", body = SaleDetail),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(sale_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.get_sale(tenant.0, sale_id).await?;
    Ok(Json(sale))
}
