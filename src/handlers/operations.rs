// src/handlers/operations.rs

// Rotas da equipe para mesas e comandas. As rotas abertas do QR code ficam
// em `handlers::public`.

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
    middleware::tenancy::TenantContext,
    models::operations::{
        CloseTablePayload, CreateOrderPayload, CreatedOrder, SetStatusPayload, StaffCall, TabClosure, TableOrder,
        TableOrderDetail, TableSummary,
    },
};

// =============================================================================
//  PEDIDOS
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/tables/{table}/orders",
    tag = "Mesas",
    request_body = CreateOrderPayload,
    params(("table" = i64, Path, description = "Número da mesa")),
    responses(
        (status = 201, description = "Pedido aberto na mesa", body = CreatedOrder),
        (status = 404, description = "Mesa inválida ou produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(table): Path<i64>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state
        .operation_service
        .create_order(tenant.0, table, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/orders",
    tag = "Mesas",
    params(("table" = i64, Path, description = "Número da mesa")),
    responses((status = 200, description = "Pedidos da mesa com itens", body = Vec<TableOrderDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(table): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.operation_service.list_orders(tenant.0, table).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    put,
    path = "/api/tables/{table}/orders/{id}/status",
    tag = "Mesas",
    request_body = SetStatusPayload,
    params(
        ("table" = i64, Path, description = "Número da mesa"),
        ("id" = i64, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Status alterado", body = TableOrder),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_order_status(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path((table, order_id)): Path<(i64, i64)>,
    Json(payload): Json<SetStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .operation_service
        .set_status(tenant.0, table, order_id, payload.status)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/tables/{table}/orders/{id}/cancel",
    tag = "Mesas",
    params(
        ("table" = i64, Path, description = "Número da mesa"),
        ("id" = i64, Path, description = "ID do pedido")
    ),
    responses(
        (status = 200, description = "Pedido cancelado", body = TableOrder),
        (status = 409, description = "Pedido já encerrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path((table, order_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .operation_service
        .cancel_order(tenant.0, table, order_id)
        .await?;
    Ok(Json(order))
}

// =============================================================================
//  CONTA DA MESA
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/tables/{table}/summary",
    tag = "Mesas",
    params(("table" = i64, Path, description = "Número da mesa")),
    responses((status = 200, description = "Conta aberta consolidada", body = TableSummary)),
    security(("api_jwt" = []))
)]
pub async fn table_summary(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(table): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.operation_service.table_summary(tenant.0, table).await?;
    Ok(Json(summary))
}

// POST /api/tables/{table}/close
#[utoipa::path(
    post,
    path = "/api/tables/{table}/close",
    tag = "Mesas",
    request_body = CloseTablePayload,
    params(("table" = i64, Path, description = "Número da mesa")),
    responses(
        (status = 201, description = "Conta fechada e venda registrada", body = TabClosure),
        (status = 409, description = "Nenhum pedido aberto na mesa"),
        (status = 403, description = "Empresa divergente da do token")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(table): Path<i64>,
    Json(payload): Json<CloseTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let closure = app_state
        .operation_service
        .close_table(tenant.0, table, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(closure)))
}

// =============================================================================
//  CHAMADOS DE GARÇOM
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/tables/{table}/call",
    tag = "Mesas",
    params(("table" = i64, Path, description = "Número da mesa")),
    responses((status = 201, description = "Chamado aberto", body = StaffCall)),
    security(("api_jwt" = []))
)]
pub async fn call_staff(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(table): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let call = app_state.operation_service.call_staff(tenant.0, table).await?;
    Ok((StatusCode::CREATED, Json(call)))
}

#[utoipa::path(
    get,
    path = "/api/staff-calls",
    tag = "Mesas",
    responses((status = 200, description = "Chamados pendentes", body = Vec<StaffCall>)),
    security(("api_jwt" = []))
)]
pub async fn list_pending_calls(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let calls = app_state.operation_service.list_pending_calls(tenant.0).await?;
    Ok(Json(calls))
}

#[utoipa::path(
    post,
    path = "/api/staff-calls/{id}/attend",
    tag = "Mesas",
    params(("id" = i64, Path, description = "ID do chamado")),
    responses(
        (status = 200, description = "Chamado atendido", body = StaffCall),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn attend_call(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(call_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let call = app_state.operation_service.attend_call(tenant.0, call_id).await?;
    Ok(Json(call))
}
