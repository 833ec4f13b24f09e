#![allow(dead_code)]

use pdv_backend::{
    common::money::Money,
    config::{AppState, Config},
    models::{
        inventory::{CreateProductPayload, Product},
        operations::{CreateOrderPayload, CreatedOrder, OrderLinePayload},
        tenancy::{CreateCompanyPayload, ProvisionedCompany},
    },
};
use tempfile::TempDir;

pub const JWT_SECRET: &str = "segredo-de-teste";
pub const ADMIN_PASSWORD: &str = "senha-forte";

/// Aplicação completa sobre um diretório temporário.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::for_data_dir(dir.path(), JWT_SECRET);
    adjust(&mut config);
    let state = AppState::new(config).await.expect("app state");
    TestApp { dir, state }
}

impl TestApp {
    pub async fn provision(&self, name: &str, admin_email: &str) -> ProvisionedCompany {
        let payload = CreateCompanyPayload {
            name: name.to_string(),
            document: None,
            email: None,
            phone: None,
            plan_id: None,
            admin_name: format!("Admin {name}"),
            admin_email: admin_email.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };
        self.state
            .tenant_service
            .provision_company(&payload)
            .await
            .expect("provision company")
    }

    pub async fn product(&self, company_id: i64, name: &str, price_cents: i64, stock: i64) -> Product {
        let payload = CreateProductPayload {
            name: name.to_string(),
            description: None,
            category: None,
            price: Money::from_cents(price_cents),
            stock,
            barcode: None,
            company_id: None,
        };
        self.state
            .inventory_service
            .create_product(company_id, &payload)
            .await
            .expect("create product")
    }

    /// Abre um pedido com (produto, quantidade, preço em centavos).
    pub async fn order(&self, company_id: i64, table: i64, lines: &[(i64, i64, i64)]) -> CreatedOrder {
        let payload = CreateOrderPayload {
            items: lines
                .iter()
                .map(|&(product_id, quantity, cents)| OrderLinePayload {
                    product_id,
                    quantity,
                    unit_price: Money::from_cents(cents),
                    notes: None,
                })
                .collect(),
            customer_name: None,
            notes: None,
        };
        self.state
            .operation_service
            .create_order(company_id, table, &payload)
            .await
            .expect("create order")
    }

    pub async fn stock_of(&self, company_id: i64, product_id: i64) -> i64 {
        self.state
            .inventory_service
            .get_product(company_id, product_id)
            .await
            .expect("get product")
            .stock
    }
}
