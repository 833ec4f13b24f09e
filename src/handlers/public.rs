// src/handlers/public.rs

// Cardápio e mesa via QR code. Sem token: a empresa vem da URL e precisa
// existir e estar ativa.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        inventory::Product,
        operations::{CreateOrderPayload, CreatedOrder, StaffCall, TableOrderDetail, TableSummary},
    },
};

#[utoipa::path(
    get,
    path = "/api/public/companies/{company_id}/products",
    tag = "Público",
    params(("company_id" = i64, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Cardápio (produtos ativos)", body = Vec<Product>),
        (status = 404, description = "Empresa inexistente ou inativa")
    )
)]
pub async fn list_menu(
    State(app_state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenant_service.require_active_company(company_id).await?;

    let products = app_state.inventory_service.list_products(company_id, false).await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/public/companies/{company_id}/tables/{table}/orders",
    tag = "Público",
    request_body = CreateOrderPayload,
    params(
        ("company_id" = i64, Path, description = "ID da empresa"),
        ("table" = i64, Path, description = "Número da mesa")
    ),
    responses(
        (status = 201, description = "Pedido enviado", body = CreatedOrder),
        (status = 404, description = "Empresa, mesa ou produto inexistente")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Path((company_id, table)): Path<(i64, i64)>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    app_state.tenant_service.require_active_company(company_id).await?;

    let created = app_state
        .operation_service
        .create_order(company_id, table, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/public/companies/{company_id}/tables/{table}/orders",
    tag = "Público",
    params(
        ("company_id" = i64, Path, description = "ID da empresa"),
        ("table" = i64, Path, description = "Número da mesa")
    ),
    responses((status = 200, description = "Pedidos da mesa", body = Vec<TableOrderDetail>))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    Path((company_id, table)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenant_service.require_active_company(company_id).await?;

    let orders = app_state.operation_service.list_orders(company_id, table).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/public/companies/{company_id}/tables/{table}/summary",
    tag = "Público",
    params(
        ("company_id" = i64, Path, description = "ID da empresa"),
        ("table" = i64, Path, description = "Número da mesa")
    ),
    responses((status = 200, description = "Conta parcial da mesa", body = TableSummary))
)]
pub async fn table_summary(
    State(app_state): State<AppState>,
    Path((company_id, table)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenant_service.require_active_company(company_id).await?;

    let summary = app_state.operation_service.table_summary(company_id, table).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/public/companies/{company_id}/tables/{table}/call",
    tag = "Público",
    params(
        ("company_id" = i64, Path, description = "ID da empresa"),
        ("table" = i64, Path, description = "Número da mesa")
    ),
    responses((status = 201, description = "Garçom chamado", body = StaffCall))
)]
pub async fn call_staff(
    State(app_state): State<AppState>,
    Path((company_id, table)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenant_service.require_active_company(company_id).await?;

    let call = app_state.operation_service.call_staff(company_id, table).await?;
    Ok((StatusCode::CREATED, Json(call)))
}
