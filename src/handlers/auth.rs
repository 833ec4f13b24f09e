// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthContext, AuthResponse, DemoSignupPayload, LoginUserPayload},
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas, conta inativa ou demonstração expirada (code = DEMO_EXPIRED)")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/demo",
    tag = "Auth",
    request_body = DemoSignupPayload,
    responses(
        (status = 201, description = "Conta de demonstração criada", body = AuthResponse),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn demo_signup(
    State(app_state): State<AppState>,
    Json(payload): Json<DemoSignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.demo_signup(&payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// Checagem de token: o guardião já fez todo o trabalho.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido", body = AuthContext),
        (status = 401, description = "Token inválido ou demonstração expirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify(user: AuthenticatedUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(user.0))
}
