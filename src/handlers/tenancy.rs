// src/handlers/tenancy.rs

// Painel master: todas as rotas exigem o papel `master`.

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
    middleware::rbac::{MasterOnly, RequireRole},
    models::{
        lifecycle::Lifecycle,
        tenancy::{
            Company, CompanyOverview, CreateCompanyPayload, CreatePlanPayload, Plan, ProvisionedCompany,
            UpdateCompanyPayload, UpdatePlanPayload,
        },
    },
};

// ---
// PLANOS
// ---

#[utoipa::path(
    post,
    path = "/api/master/plans",
    tag = "Master",
    request_body = CreatePlanPayload,
    responses(
        (status = 201, description = "Plano criado", body = Plan),
        (status = 409, description = "Nome de plano repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let plan = app_state.tenant_service.create_plan(&payload).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    get,
    path = "/api/master/plans",
    tag = "Master",
    responses((status = 200, description = "Planos", body = Vec<Plan>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.tenant_service.list_plans().await?;
    Ok(Json(plans))
}

#[utoipa::path(
    put,
    path = "/api/master/plans/{id}",
    tag = "Master",
    request_body = UpdatePlanPayload,
    params(("id" = i64, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano atualizado", body = Plan),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(plan_id): Path<i64>,
    Json(payload): Json<UpdatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let plan = app_state.tenant_service.update_plan(plan_id, &payload).await?;
    Ok(Json(plan))
}

#[utoipa::path(
    post,
    path = "/api/master/plans/{id}/disable",
    tag = "Master",
    params(("id" = i64, Path, description = "ID do plano")),
    responses((status = 204, description = "Plano desativado")),
    security(("api_jwt" = []))
)]
pub async fn disable_plan(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(plan_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .tenant_service
        .set_plan_lifecycle(plan_id, Lifecycle::Disabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/master/plans/{id}/restore",
    tag = "Master",
    params(("id" = i64, Path, description = "ID do plano")),
    responses((status = 204, description = "Plano reativado")),
    security(("api_jwt" = []))
)]
pub async fn restore_plan(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(plan_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .tenant_service
        .set_plan_lifecycle(plan_id, Lifecycle::Active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// EMPRESAS
// ---

#[utoipa::path(
    post,
    path = "/api/master/companies",
    tag = "Master",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa e administrador criados", body = ProvisionedCompany),
        (status = 409, description = "Documento ou e-mail repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let provisioned = app_state.tenant_service.provision_company(&payload).await?;
    Ok((StatusCode::CREATED, Json(provisioned)))
}

#[utoipa::path(
    get,
    path = "/api/master/companies",
    tag = "Master",
    responses((status = 200, description = "Empresas com acumulados de vendas", body = Vec<CompanyOverview>)),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.tenant_service.list_companies().await?;
    Ok(Json(companies))
}

#[utoipa::path(
    get,
    path = "/api/master/companies/{id}",
    tag = "Master",
    params(("id" = i64, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa", body = CompanyOverview),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(company_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.tenant_service.get_company(company_id).await?;
    Ok(Json(company))
}

#[utoipa::path(
    put,
    path = "/api/master/companies/{id}",
    tag = "Master",
    request_body = UpdateCompanyPayload,
    params(("id" = i64, Path, description = "ID da empresa")),
    responses((status = 200, description = "Empresa atualizada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(company_id): Path<i64>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let company = app_state.tenant_service.update_company(company_id, &payload).await?;
    Ok(Json(company))
}

#[utoipa::path(
    post,
    path = "/api/master/companies/{id}/disable",
    tag = "Master",
    params(("id" = i64, Path, description = "ID da empresa")),
    responses((status = 204, description = "Empresa desativada; tokens dela deixam de valer")),
    security(("api_jwt" = []))
)]
pub async fn disable_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(company_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .tenant_service
        .set_company_lifecycle(company_id, Lifecycle::Disabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/master/companies/{id}/restore",
    tag = "Master",
    params(("id" = i64, Path, description = "ID da empresa")),
    responses((status = 204, description = "Empresa reativada")),
    security(("api_jwt" = []))
)]
pub async fn restore_company(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(company_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .tenant_service
        .set_company_lifecycle(company_id, Lifecycle::Active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
