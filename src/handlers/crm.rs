// src/handlers/crm.rs

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
    models::crm::{CreateCustomerPayload, Customer, UpdateCustomerPayload},
};

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "CRM",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let customer = app_state.crm_service.create_customer(tenant.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "CRM",
    responses((status = 200, description = "Clientes da empresa", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.crm_service.list_customers(tenant.0).await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(customer_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service.get_customer(tenant.0, customer_id).await?;
    Ok(Json(customer))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "CRM",
    request_body = UpdateCustomerPayload,
    params(("id" = i64, Path, description = "ID do cliente")),
    responses((status = 200, description = "Cliente atualizado", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(customer_id): Path<i64>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let customer = app_state
        .crm_service
        .update_customer(tenant.0, customer_id, &payload)
        .await?;
    Ok(Json(customer))
}

// Clientes são apagados de fato; vendas antigas perdem só o vínculo.
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "CRM",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(customer_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.crm_service.delete_customer(tenant.0, customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
