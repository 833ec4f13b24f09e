// src/handlers/finance.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::finance::{CashClosure, CreateCashClosurePayload},
};

// POST /api/cash-closures
#[utoipa::path(
    post,
    path = "/api/cash-closures",
    tag = "Financeiro",
    request_body = CreateCashClosurePayload,
    responses(
        (status = 201, description = "Caixa fechado com valores esperados e diferença", body = CashClosure),
        (status = 400, description = "Valores negativos ou abertura no futuro")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_cash_session(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateCashClosurePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let closure = app_state
        .finance_service
        .close_cash_session(tenant.0, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(closure)))
}

// GET /api/cash-closures
#[utoipa::path(
    get,
    path = "/api/cash-closures",
    tag = "Financeiro",
    responses((status = 200, description = "Fechamentos, mais recentes primeiro", body = Vec<CashClosure>)),
    security(("api_jwt" = []))
)]
pub async fn list_cash_closures(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let closures = app_state.finance_service.list_cash_closures(tenant.0).await?;
    Ok(Json(closures))
}
