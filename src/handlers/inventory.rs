// src/handlers/inventory.rs

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
        inventory::{CreateProductPayload, Product, ProductQuery, StockAdjustmentPayload, UpdateProductPayload},
        lifecycle::Lifecycle,
    },
};

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Produtos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Empresa divergente da do token")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let product = app_state.inventory_service.create_product(tenant.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Produtos",
    params(ProductQuery),
    responses((status = 200, description = "Produtos da empresa", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, AppError> {
    tenant.ensure_same_company(query.company_id)?;

    let products = app_state
        .inventory_service
        .list_products(tenant.0, query.include_disabled)
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Produtos",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.get_product(tenant.0, product_id).await?;
    Ok(Json(product))
}

// GET /api/products/barcode/{code}
#[utoipa::path(
    get,
    path = "/api/products/barcode/{code}",
    tag = "Produtos",
    params(("code" = String, Path, description = "Código de barras")),
    responses(
        (status = 200, description = "Produto ativo com o código", body = Product),
        (status = 404, description = "Nenhum produto ativo com esse código")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_barcode(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.find_by_barcode(tenant.0, &code).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Produtos",
    request_body = UpdateProductPayload,
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.ensure_same_company(payload.company_id)?;

    let product = app_state
        .inventory_service
        .update_product(tenant.0, product_id, &payload)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/disable",
    tag = "Produtos",
    params(("id" = i64, Path, description = "ID do produto")),
    responses((status = 204, description = "Produto desativado")),
    security(("api_jwt" = []))
)]
pub async fn disable_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventory_service
        .set_lifecycle(tenant.0, product_id, Lifecycle::Disabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/restore",
    tag = "Produtos",
    params(("id" = i64, Path, description = "ID do produto")),
    responses((status = 204, description = "Produto reativado")),
    security(("api_jwt" = []))
)]
pub async fn restore_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .inventory_service
        .set_lifecycle(tenant.0, product_id, Lifecycle::Active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/products/{id}/stock
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Produtos",
    request_body = StockAdjustmentPayload,
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Estoque ajustado", body = Product),
        (status = 400, description = "Saldo insuficiente para a retirada")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(product_id): Path<i64>,
    Json(payload): Json<StockAdjustmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .adjust_stock(tenant.0, product_id, payload.delta)
        .await?;
    Ok(Json(product))
}
