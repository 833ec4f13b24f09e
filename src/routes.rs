// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o roteador completo da API.
pub fn app_router(app_state: AppState) -> Router {
    // Só /verify passa pelo guardião; login e demo são públicas.
    let auth_routes = Router::new()
        .route("/verify", get(handlers::auth::verify))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
        .route("/login", post(handlers::auth::login))
        .route("/demo", post(handlers::auth::demo_signup));

    // Cardápio e mesa via QR code (públicas, empresa na URL)
    let public_routes = Router::new()
        .route("/companies/{company_id}/products", get(handlers::public::list_menu))
        .route(
            "/companies/{company_id}/tables/{table}/orders",
            post(handlers::public::create_order).get(handlers::public::list_orders),
        )
        .route(
            "/companies/{company_id}/tables/{table}/summary",
            get(handlers::public::table_summary),
        )
        .route("/companies/{company_id}/tables/{table}/call", post(handlers::public::call_staff));

    let master_routes = Router::new()
        .route(
            "/plans",
            post(handlers::tenancy::create_plan).get(handlers::tenancy::list_plans),
        )
        .route("/plans/{id}", put(handlers::tenancy::update_plan))
        .route("/plans/{id}/disable", post(handlers::tenancy::disable_plan))
        .route("/plans/{id}/restore", post(handlers::tenancy::restore_plan))
        .route(
            "/companies",
            post(handlers::tenancy::create_company).get(handlers::tenancy::list_companies),
        )
        .route(
            "/companies/{id}",
            get(handlers::tenancy::get_company).put(handlers::tenancy::update_company),
        )
        .route("/companies/{id}/disable", post(handlers::tenancy::disable_company))
        .route("/companies/{id}/restore", post(handlers::tenancy::restore_company));

    // Tudo daqui para baixo opera na empresa do token.
    let tenant_routes = Router::new()
        // Usuários
        .route(
            "/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route("/users/{id}/disable", post(handlers::users::disable_user))
        .route("/users/{id}/restore", post(handlers::users::restore_user))
        .route("/users/{id}/password", put(handlers::users::change_password))
        // Produtos
        .route(
            "/products",
            post(handlers::inventory::create_product).get(handlers::inventory::list_products),
        )
        .route("/products/barcode/{code}", get(handlers::inventory::find_by_barcode))
        .route(
            "/products/{id}",
            get(handlers::inventory::get_product).put(handlers::inventory::update_product),
        )
        .route("/products/{id}/disable", post(handlers::inventory::disable_product))
        .route("/products/{id}/restore", post(handlers::inventory::restore_product))
        .route("/products/{id}/stock", post(handlers::inventory::adjust_stock))
        // Clientes
        .route(
            "/customers",
            post(handlers::crm::create_customer).get(handlers::crm::list_customers),
        )
        .route(
            "/customers/{id}",
            get(handlers::crm::get_customer)
                .put(handlers::crm::update_customer)
                .delete(handlers::crm::delete_customer),
        )
        // Funcionários
        .route(
            "/employees",
            post(handlers::staff::create_employee).get(handlers::staff::list_employees),
        )
        .route(
            "/employees/{id}",
            get(handlers::staff::get_employee).put(handlers::staff::update_employee),
        )
        .route("/employees/{id}/disable", post(handlers::staff::disable_employee))
        .route("/employees/{id}/restore", post(handlers::staff::restore_employee))
        // Vendas
        .route(
            "/sales",
            post(handlers::sales::create_sale).get(handlers::sales::list_sales),
        )
        .route("/sales/{id}", get(handlers::sales::get_sale))
        // Mesas
        .route(
            "/tables/{table}/orders",
            post(handlers::operations::create_order).get(handlers::operations::list_orders),
        )
        .route(
            "/tables/{table}/orders/{id}/status",
            put(handlers::operations::set_order_status),
        )
        .route(
            "/tables/{table}/orders/{id}/cancel",
            post(handlers::operations::cancel_order),
        )
        .route("/tables/{table}/summary", get(handlers::operations::table_summary))
        .route("/tables/{table}/close", post(handlers::operations::close_table))
        .route("/tables/{table}/call", post(handlers::operations::call_staff))
        .route("/staff-calls", get(handlers::operations::list_pending_calls))
        .route("/staff-calls/{id}/attend", post(handlers::operations::attend_call))
        // Financeiro
        .route(
            "/cash-closures",
            post(handlers::finance::close_cash_session).get(handlers::finance::list_cash_closures),
        )
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .nest("/master", master_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api", tenant_routes)
        .with_state(app_state)
}
