// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common::money::Money;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::demo_signup,
        handlers::auth::verify,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::disable_user,
        handlers::users::restore_user,
        handlers::users::change_password,

        // --- Master ---
        handlers::tenancy::create_plan,
        handlers::tenancy::list_plans,
        handlers::tenancy::update_plan,
        handlers::tenancy::disable_plan,
        handlers::tenancy::restore_plan,
        handlers::tenancy::create_company,
        handlers::tenancy::list_companies,
        handlers::tenancy::get_company,
        handlers::tenancy::update_company,
        handlers::tenancy::disable_company,
        handlers::tenancy::restore_company,

        // --- Produtos ---
        handlers::inventory::create_product,
        handlers::inventory::list_products,
        handlers::inventory::get_product,
        handlers::inventory::find_by_barcode,
        handlers::inventory::update_product,
        handlers::inventory::disable_product,
        handlers::inventory::restore_product,
        handlers::inventory::adjust_stock,

        // --- CRM ---
        handlers::crm::create_customer,
        handlers::crm::list_customers,
        handlers::crm::get_customer,
        handlers::crm::update_customer,
        handlers::crm::delete_customer,

        // --- Funcionários ---
        handlers::staff::create_employee,
        handlers::staff::list_employees,
        handlers::staff::get_employee,
        handlers::staff::update_employee,
        handlers::staff::disable_employee,
        handlers::staff::restore_employee,

        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,

        // --- Mesas ---
        handlers::operations::create_order,
        handlers::operations::list_orders,
        handlers::operations::set_order_status,
        handlers::operations::cancel_order,
        handlers::operations::table_summary,
        handlers::operations::close_table,
        handlers::operations::call_staff,
        handlers::operations::list_pending_calls,
        handlers::operations::attend_call,

        // --- Público ---
        handlers::public::list_menu,
        handlers::public::create_order,
        handlers::public::list_orders,
        handlers::public::table_summary,
        handlers::public::call_staff,

        // --- Financeiro ---
        handlers::finance::close_cash_session,
        handlers::finance::list_cash_closures,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            Money,
            models::lifecycle::Lifecycle,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::AuthContext,
            models::auth::LoginUserPayload,
            models::auth::DemoSignupPayload,
            models::auth::CreateUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- TENANCY ---
            models::tenancy::Plan,
            models::tenancy::Company,
            models::tenancy::CompanyOverview,
            models::tenancy::CreatePlanPayload,
            models::tenancy::UpdatePlanPayload,
            models::tenancy::CreateCompanyPayload,
            models::tenancy::UpdateCompanyPayload,
            models::tenancy::ProvisionedCompany,

            // --- Inventory ---
            models::inventory::Product,
            models::inventory::CreateProductPayload,
            models::inventory::UpdateProductPayload,
            models::inventory::StockAdjustmentPayload,

            // --- CRM ---
            models::crm::Customer,
            models::crm::CreateCustomerPayload,
            models::crm::UpdateCustomerPayload,

            // --- Staff ---
            models::staff::Employee,
            models::staff::CreateEmployeePayload,
            models::staff::UpdateEmployeePayload,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleDetail,
            models::sales::SaleLinePayload,
            models::sales::CreateSalePayload,

            // --- Operations ---
            models::operations::OrderStatus,
            models::operations::StaffCallStatus,
            models::operations::TableOrder,
            models::operations::OrderLine,
            models::operations::TableOrderDetail,
            models::operations::CreatedOrder,
            models::operations::TableSummary,
            models::operations::TabClosure,
            models::operations::StaffCall,
            models::operations::OrderLinePayload,
            models::operations::CreateOrderPayload,
            models::operations::SetStatusPayload,
            models::operations::CloseTablePayload,

            // --- FINANCE ---
            models::finance::CashClosure,
            models::finance::PaymentTotals,
            models::finance::CreateCashClosurePayload,

            // --- DASHBOARD ---
            models::dashboard::CompanyTotals,
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Login, demonstração e verificação de token"),
        (name = "Users", description = "Usuários da empresa"),
        (name = "Master", description = "Painel master: planos e empresas"),
        (name = "Produtos", description = "Cardápio, estoque e código de barras"),
        (name = "CRM", description = "Clientes"),
        (name = "Funcionários", description = "Equipe da loja"),
        (name = "Vendas", description = "Checkout direto do PDV"),
        (name = "Mesas", description = "Comandas, fechamento de conta e chamados"),
        (name = "Público", description = "Pedidos pelo QR code da mesa"),
        (name = "Financeiro", description = "Fechamento de caixa"),
        (name = "Dashboard", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
