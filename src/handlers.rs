pub mod auth;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod public;
pub mod sales;
pub mod staff;
pub mod tenancy;
pub mod users;
