pub mod store;
pub use store::TenantRegistry;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod operations_repo;
pub use operations_repo::OperationsRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod legacy_repo;
pub use legacy_repo::LegacyRepository;
