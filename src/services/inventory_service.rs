// src/services/inventory_service.rs

use std::sync::Arc;

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{InventoryRepository, TenantRegistry},
    models::{
        inventory::{CreateProductPayload, Product, UpdateProductPayload},
        lifecycle::Lifecycle,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    registry: Arc<TenantRegistry>,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, registry: Arc<TenantRegistry>) -> Self {
        Self { inventory_repo, registry }
    }

    // --- CREATE PRODUCT ---
    pub async fn create_product(&self, company_id: i64, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let store = self.registry.store(company_id).await?;
        let product = self
            .inventory_repo
            .create_product(
                &store,
                company_id,
                &payload.name,
                blank_to_none(payload.description.as_deref()),
                blank_to_none(payload.category.as_deref()),
                payload.price,
                payload.stock,
                blank_to_none(payload.barcode.as_deref()),
            )
            .await?;

        tracing::info!(company_id, product_id = product.id, "📦 Produto criado: {}", product.name);
        Ok(product)
    }

    pub async fn list_products(&self, company_id: i64, include_disabled: bool) -> Result<Vec<Product>, AppError> {
        let store = self.registry.store(company_id).await?;
        self.inventory_repo
            .list_products(&store, company_id, include_disabled)
            .await
    }

    pub async fn get_product(&self, company_id: i64, product_id: i64) -> Result<Product, AppError> {
        let store = self.registry.store(company_id).await?;
        self.inventory_repo
            .find_product(&store, company_id, product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    /// Leitor de código de barras do PDV: só devolve produtos ativos.
    pub async fn find_by_barcode(&self, company_id: i64, barcode: &str) -> Result<Product, AppError> {
        let store = self.registry.store(company_id).await?;
        self.inventory_repo
            .find_by_barcode(&store, company_id, barcode)
            .await?
            .filter(|p| p.lifecycle.is_active())
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn update_product(
        &self,
        company_id: i64,
        product_id: i64,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let store = self.registry.store(company_id).await?;
        self.inventory_repo
            .update_product(
                &store,
                company_id,
                product_id,
                blank_to_none(payload.name.as_deref()),
                blank_to_none(payload.description.as_deref()),
                blank_to_none(payload.category.as_deref()),
                payload.price,
                payload.stock,
                blank_to_none(payload.barcode.as_deref()),
            )
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn set_lifecycle(&self, company_id: i64, product_id: i64, lifecycle: Lifecycle) -> Result<(), AppError> {
        let store = self.registry.store(company_id).await?;
        if !self
            .inventory_repo
            .set_lifecycle(&store, company_id, product_id, lifecycle)
            .await?
        {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }

    // --- AJUSTE MANUAL (entrada / perda) ---
    pub async fn adjust_stock(&self, company_id: i64, product_id: i64, delta: i64) -> Result<Product, AppError> {
        let store = self.registry.store(company_id).await?;
        let mut tx = store.begin().await?;

        let current = self
            .inventory_repo
            .find_product(&mut *tx, company_id, product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;

        let updated = self
            .inventory_repo
            .adjust_stock(&mut *tx, company_id, product_id, delta)
            .await?
            .ok_or(AppError::InsufficientStock {
                product_id,
                available: current.stock,
                requested: -delta,
            })?;

        tx.commit().await?;
        tracing::info!(company_id, product_id, delta, stock = updated.stock, "Estoque ajustado");
        Ok(updated)
    }
}
