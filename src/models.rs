pub mod auth;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod lifecycle;
pub mod operations;
pub mod sales;
pub mod staff;
pub mod tenancy;
