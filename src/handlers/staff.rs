// src/handlers/staff.rs

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
    models::{
        lifecycle::Lifecycle,
        staff::{CreateEmployeePayload, Employee, EmployeeQuery, UpdateEmployeePayload},
    },
};

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Funcionários",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Employee),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let employee = app_state.staff_service.create_employee(tenant.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Funcionários",
    params(EmployeeQuery),
    responses((status = 200, description = "Funcionários da empresa", body = Vec<Employee>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<EmployeeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let employees = app_state
        .staff_service
        .list_employees(tenant.0, query.include_disabled)
        .await?;
    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Funcionários",
    params(("id" = i64, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.staff_service.get_employee(tenant.0, employee_id).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Funcionários",
    request_body = UpdateEmployeePayload,
    params(("id" = i64, Path, description = "ID do funcionário")),
    responses((status = 200, description = "Funcionário atualizado", body = Employee)),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(employee_id): Path<i64>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let employee = app_state
        .staff_service
        .update_employee(tenant.0, employee_id, &payload)
        .await?;
    Ok(Json(employee))
}

#[utoipa::path(
    post,
    path = "/api/employees/{id}/disable",
    tag = "Funcionários",
    params(("id" = i64, Path, description = "ID do funcionário")),
    responses((status = 204, description = "Funcionário desativado")),
    security(("api_jwt" = []))
)]
pub async fn disable_employee(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .staff_service
        .set_lifecycle(tenant.0, employee_id, Lifecycle::Disabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/employees/{id}/restore",
    tag = "Funcionários",
    params(("id" = i64, Path, description = "ID do funcionário")),
    responses((status = 204, description = "Funcionário reativado")),
    security(("api_jwt" = []))
)]
pub async fn restore_employee(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .staff_service
        .set_lifecycle(tenant.0, employee_id, Lifecycle::Active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
