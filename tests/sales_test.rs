mod common;

use chrono::{Duration, Utc};
use pdv_backend::{
    common::{error::AppError, money::Money},
    models::{
        crm::CreateCustomerPayload,
        finance::CreateCashClosurePayload,
        sales::{CreateSalePayload, PaymentMethod, SaleLinePayload, SalesQuery},
    },
};

use common::spawn_app;

fn sale_of(lines: &[(i64, i64)], payment_method: PaymentMethod) -> CreateSalePayload {
    CreateSalePayload {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| SaleLinePayload { product_id, quantity })
            .collect(),
        customer_id: None,
        employee_id: None,
        discount: Money::ZERO,
        payment_method,
        notes: None,
        company_id: None,
    }
}

#[tokio::test]
async fn checkout_prices_from_catalog_and_decrements_stock() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;
    let arroz = app.product(id, "Arroz", 2590, 10).await;
    let feijao = app.product(id, "Feijão", 899, 10).await;

    let detail = app
        .state
        .sales_service
        .create_sale(id, &sale_of(&[(arroz.id, 2), (feijao.id, 1)], PaymentMethod::Pix))
        .await
        .unwrap();

    assert_eq!(detail.sale.total, Money::from_cents(2 * 2590 + 899));
    assert_eq!(detail.items.len(), 2);
    assert_eq!(app.stock_of(id, arroz.id).await, 8);
    assert_eq!(app.stock_of(id, feijao.id).await, 9);

    let totals = app.state.dashboard_service.get_totals(id).await.unwrap();
    assert_eq!(totals.sales_count, 1);
    assert_eq!(totals.total_sales, detail.sale.total);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_the_whole_sale() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;
    let leite = app.product(id, "Leite", 550, 10).await;
    let queijo = app.product(id, "Queijo", 3200, 5).await;

    let err = app
        .state
        .sales_service
        .create_sale(id, &sale_of(&[(leite.id, 3), (queijo.id, 6)], PaymentMethod::Cash))
        .await
        .unwrap_err();

    match err {
        AppError::InsufficientStock { product_id, available, requested } => {
            assert_eq!(product_id, queijo.id);
            assert_eq!(available, 5);
            assert_eq!(requested, 6);
        }
        other => panic!("esperava InsufficientStock, veio {other:?}"),
    }

    // A primeira linha também foi desfeita.
    assert_eq!(app.stock_of(id, leite.id).await, 10);
    assert_eq!(app.stock_of(id, queijo.id).await, 5);

    let sales = app
        .state
        .sales_service
        .list_sales(id, &SalesQuery::default())
        .await
        .unwrap();
    assert!(sales.is_empty());
    assert_eq!(app.state.dashboard_service.get_totals(id).await.unwrap().sales_count, 0);
}

#[tokio::test]
async fn sale_with_unknown_customer_is_not_found() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;
    let pao = app.product(id, "Pão", 100, 10).await;

    let mut payload = sale_of(&[(pao.id, 1)], PaymentMethod::Cash);
    payload.customer_id = Some(404);

    let err = app.state.sales_service.create_sale(id, &payload).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Cliente")));
    assert_eq!(app.stock_of(id, pao.id).await, 10);
}

#[tokio::test]
async fn deleting_a_customer_keeps_their_sales() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;
    let pao = app.product(id, "Pão", 100, 10).await;

    let customer = app
        .state
        .crm_service
        .create_customer(
            id,
            &CreateCustomerPayload {
                name: "Maria".to_string(),
                cpf: None,
                email: None,
                phone: None,
                address: None,
                company_id: None,
            },
        )
        .await
        .unwrap();

    let mut payload = sale_of(&[(pao.id, 1)], PaymentMethod::Cash);
    payload.customer_id = Some(customer.id);
    let detail = app.state.sales_service.create_sale(id, &payload).await.unwrap();

    app.state.crm_service.delete_customer(id, customer.id).await.unwrap();

    let sale = app.state.sales_service.get_sale(id, detail.sale.id).await.unwrap();
    assert_eq!(sale.sale.customer_id, None);
}

#[tokio::test]
async fn cash_closure_compares_reported_with_sales_in_the_window() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;
    let cafe = app.product(id, "Café", 1500, 10).await;
    let opened_at = Utc::now() - Duration::hours(1);

    let sales = &app.state.sales_service;
    sales.create_sale(id, &sale_of(&[(cafe.id, 2)], PaymentMethod::Cash)).await.unwrap();
    sales.create_sale(id, &sale_of(&[(cafe.id, 1)], PaymentMethod::Card)).await.unwrap();

    let closure = app
        .state
        .finance_service
        .close_cash_session(
            id,
            &CreateCashClosurePayload {
                employee_id: None,
                opened_at,
                reported_cash: Money::from_cents(2500),
                reported_card: Money::from_cents(1500),
                reported_pix: Money::ZERO,
                notes: None,
                company_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(closure.expected_cash, Money::from_cents(3000));
    assert_eq!(closure.expected_card, Money::from_cents(1500));
    assert_eq!(closure.expected_pix, Money::ZERO);
    assert_eq!(closure.difference, Money::from_cents(-500));

    let listed = app.state.finance_service.list_cash_closures(id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn cash_session_opened_in_the_future_is_rejected() {
    let app = spawn_app().await;
    let id = app.provision("Mercado", "admin@mercado.com").await.company.id;

    let err = app
        .state
        .finance_service
        .close_cash_session(
            id,
            &CreateCashClosurePayload {
                employee_id: None,
                opened_at: Utc::now() + Duration::hours(2),
                reported_cash: Money::ZERO,
                reported_card: Money::ZERO,
                reported_pix: Money::ZERO,
                notes: None,
                company_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
