// src/services/crm_service.rs

use std::sync::Arc;

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{CrmRepository, TenantRegistry},
    models::crm::{normalize_cpf, CreateCustomerPayload, Customer, UpdateCustomerPayload},
};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    registry: Arc<TenantRegistry>,
}

impl CrmService {
    pub fn new(repo: CrmRepository, registry: Arc<TenantRegistry>) -> Self {
        Self { repo, registry }
    }

    pub async fn create_customer(&self, company_id: i64, payload: &CreateCustomerPayload) -> Result<Customer, AppError> {
        let store = self.registry.store(company_id).await?;
        let cpf = blank_to_none(payload.cpf.as_deref()).map(normalize_cpf);

        self.repo
            .create_customer(
                &store,
                company_id,
                &payload.name,
                cpf.as_deref(),
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                blank_to_none(payload.address.as_deref()),
            )
            .await
    }

    pub async fn list_customers(&self, company_id: i64) -> Result<Vec<Customer>, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo.list_customers(&store, company_id).await
    }

    pub async fn get_customer(&self, company_id: i64, customer_id: i64) -> Result<Customer, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo
            .find_customer(&store, company_id, customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn update_customer(
        &self,
        company_id: i64,
        customer_id: i64,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer, AppError> {
        let store = self.registry.store(company_id).await?;
        let cpf = blank_to_none(payload.cpf.as_deref()).map(normalize_cpf);

        self.repo
            .update_customer(
                &store,
                company_id,
                customer_id,
                blank_to_none(payload.name.as_deref()),
                cpf.as_deref(),
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                blank_to_none(payload.address.as_deref()),
            )
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    /// Vendas antigas mantêm o histórico: o vínculo vira NULL (ON DELETE SET NULL).
    pub async fn delete_customer(&self, company_id: i64, customer_id: i64) -> Result<(), AppError> {
        let store = self.registry.store(company_id).await?;
        if !self.repo.delete_customer(&store, company_id, customer_id).await? {
            return Err(AppError::NotFound("Cliente"));
        }
        Ok(())
    }
}
