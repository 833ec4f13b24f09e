pub mod auth;
pub mod crm_service;
pub mod dashboard_service;
pub mod finance_service;
pub mod inventory_service;
pub mod migration_service;
pub mod operation_service;
pub mod sales_service;
pub mod staff_service;
pub mod tenancy_service;
