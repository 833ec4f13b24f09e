// src/services/staff_service.rs

use std::sync::Arc;

use crate::{
    common::{db_utils::blank_to_none, error::AppError},
    db::{StaffRepository, TenantRegistry},
    models::{
        lifecycle::Lifecycle,
        staff::{CreateEmployeePayload, Employee, UpdateEmployeePayload},
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct StaffService {
    repo: StaffRepository,
    registry: Arc<TenantRegistry>,
}

impl StaffService {
    pub fn new(repo: StaffRepository, registry: Arc<TenantRegistry>) -> Self {
        Self { repo, registry }
    }

    pub async fn create_employee(&self, company_id: i64, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        // Senha é opcional (garçom sem acesso ao sistema).
        let password_hash = match blank_to_none(payload.password.as_deref()) {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let store = self.registry.store(company_id).await?;
        self.repo
            .create_employee(
                &store,
                company_id,
                &payload.name,
                &payload.role,
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                password_hash.as_deref(),
            )
            .await
    }

    pub async fn list_employees(&self, company_id: i64, include_disabled: bool) -> Result<Vec<Employee>, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo.list_employees(&store, company_id, include_disabled).await
    }

    pub async fn get_employee(&self, company_id: i64, employee_id: i64) -> Result<Employee, AppError> {
        let store = self.registry.store(company_id).await?;
        self.repo
            .find_employee(&store, company_id, employee_id)
            .await?
            .ok_or(AppError::NotFound("Funcionário"))
    }

    pub async fn update_employee(
        &self,
        company_id: i64,
        employee_id: i64,
        payload: &UpdateEmployeePayload,
    ) -> Result<Employee, AppError> {
        let password_hash = match blank_to_none(payload.password.as_deref()) {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let store = self.registry.store(company_id).await?;
        self.repo
            .update_employee(
                &store,
                company_id,
                employee_id,
                blank_to_none(payload.name.as_deref()),
                blank_to_none(payload.role.as_deref()),
                blank_to_none(payload.email.as_deref()),
                blank_to_none(payload.phone.as_deref()),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::NotFound("Funcionário"))
    }

    pub async fn set_lifecycle(&self, company_id: i64, employee_id: i64, lifecycle: Lifecycle) -> Result<(), AppError> {
        let store = self.registry.store(company_id).await?;
        if !self.repo.set_lifecycle(&store, company_id, employee_id, lifecycle).await? {
            return Err(AppError::NotFound("Funcionário"));
        }
        Ok(())
    }
}
