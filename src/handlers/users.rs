// src/handlers/users.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, RequireRole},
        tenancy::TenantContext,
    },
    models::{
        auth::{ChangePasswordPayload, CreateUserPayload, User, UserRole},
        lifecycle::Lifecycle,
    },
};

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado na empresa do token", body = User),
        (status = 403, description = "Sem permissão ou empresa divergente"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let created = app_state.auth_service.create_user(&user.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Usuários da empresa", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_users(tenant.0).await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/disable",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário desativado"),
        (status = 404, description = "Usuário não encontrado nesta empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn disable_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .set_user_lifecycle(&user.0, user_id, Lifecycle::Disabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/restore",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário reativado"),
        (status = 404, description = "Usuário não encontrado nesta empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn restore_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .set_user_lifecycle(&user.0, user_id, Lifecycle::Active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// O próprio usuário troca a sua senha; administradores trocam a de qualquer um da empresa.
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    tag = "Users",
    request_body = ChangePasswordPayload,
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<i64>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let caller = &user.0;
    if caller.user_id != user_id && caller.role == UserRole::Operator {
        return Err(AppError::Forbidden);
    }

    app_state
        .auth_service
        .change_password(caller.company_id, user_id, &payload.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
