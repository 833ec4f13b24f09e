mod common;

use pdv_backend::{
    common::{error::AppError, money::Money},
    models::{
        operations::{CloseTablePayload, CreateOrderPayload, OrderLinePayload, OrderStatus},
        sales::{PaymentMethod, SalesQuery},
    },
};

use common::spawn_app;

fn close_with(discount_cents: i64) -> CloseTablePayload {
    CloseTablePayload {
        discount: Money::from_cents(discount_cents),
        payment_method: PaymentMethod::Cash,
        customer_id: None,
        employee_id: None,
        company_id: None,
    }
}

#[tokio::test]
async fn closing_a_tab_consolidates_open_orders_into_one_sale() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let chopp = app.product(id, "Chopp", 1000, 20).await;
    let porcao = app.product(id, "Porção", 450, 20).await;

    app.order(id, 5, &[(chopp.id, 2, 1000), (porcao.id, 1, 450)]).await;
    app.order(id, 5, &[(chopp.id, 1, 1000)]).await;
    // Outra mesa não entra na conta.
    app.order(id, 6, &[(chopp.id, 4, 1000)]).await;

    let summary = app.state.operation_service.table_summary(id, 5).await.unwrap();
    assert_eq!(summary.open_orders, 2);
    assert_eq!(summary.total, Money::from_cents(3450));

    let closure = app
        .state
        .operation_service
        .close_table(id, 5, &close_with(450))
        .await
        .unwrap();

    assert_eq!(closure.gross_total, Money::from_cents(3450));
    assert_eq!(closure.net_total, Money::from_cents(3000));
    assert_eq!(closure.orders_closed_count, 2);
    assert_eq!(closure.line_count, 3);

    let sale = app.state.sales_service.get_sale(id, closure.sale_id).await.unwrap();
    assert_eq!(sale.sale.total, Money::from_cents(3000));
    assert_eq!(sale.sale.table_number, Some(5));
    assert_eq!(sale.sale.notes.as_deref(), Some("Mesa 5"));
    assert_eq!(sale.items.iter().map(|i| i.quantity).sum::<i64>(), 4);

    // Estoque baixa pela soma das quantidades da mesa 5 apenas.
    assert_eq!(app.stock_of(id, chopp.id).await, 17);
    assert_eq!(app.stock_of(id, porcao.id).await, 19);

    let totals = app.state.dashboard_service.get_totals(id).await.unwrap();
    assert_eq!(totals.sales_count, 1);
    assert_eq!(totals.total_sales, Money::from_cents(3000));

    let after = app.state.operation_service.table_summary(id, 5).await.unwrap();
    assert_eq!(after.open_orders, 0);
    assert_eq!(after.total, Money::ZERO);
}

#[tokio::test]
async fn closing_twice_reports_nothing_to_close() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let agua = app.product(id, "Água", 300, 10).await;

    app.order(id, 2, &[(agua.id, 1, 300)]).await;
    app.state.operation_service.close_table(id, 2, &close_with(0)).await.unwrap();

    let err = app
        .state
        .operation_service
        .close_table(id, 2, &close_with(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NothingToClose(2)));

    let totals = app.state.dashboard_service.get_totals(id).await.unwrap();
    assert_eq!(totals.sales_count, 1);
}

#[tokio::test]
async fn discount_larger_than_the_tab_floors_at_zero() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let prato = app.product(id, "Prato", 3000, 10).await;

    app.order(id, 1, &[(prato.id, 1, 3000)]).await;
    let closure = app
        .state
        .operation_service
        .close_table(id, 1, &close_with(5000))
        .await
        .unwrap();

    assert_eq!(closure.gross_total, Money::from_cents(3000));
    assert_eq!(closure.net_total, Money::ZERO);
}

#[tokio::test]
async fn tab_closure_does_not_check_stock() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let vinho = app.product(id, "Vinho", 9000, 1).await;

    app.order(id, 4, &[(vinho.id, 3, 9000)]).await;
    app.state.operation_service.close_table(id, 4, &close_with(0)).await.unwrap();

    assert_eq!(app.stock_of(id, vinho.id).await, -2);
}

#[tokio::test]
async fn cancelled_orders_stay_out_of_the_tab() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let cafe = app.product(id, "Café", 500, 10).await;

    let wrong = app.order(id, 7, &[(cafe.id, 5, 500)]).await;
    app.order(id, 7, &[(cafe.id, 1, 500)]).await;
    app.state.operation_service.cancel_order(id, 7, wrong.order_id).await.unwrap();

    let closure = app
        .state
        .operation_service
        .close_table(id, 7, &close_with(0))
        .await
        .unwrap();
    assert_eq!(closure.orders_closed_count, 1);
    assert_eq!(closure.gross_total, Money::from_cents(500));
    assert_eq!(app.stock_of(id, cafe.id).await, 9);
}

#[tokio::test]
async fn terminal_orders_cannot_change_status() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let suco = app.product(id, "Suco", 700, 10).await;

    let order = app.order(id, 8, &[(suco.id, 1, 700)]).await;
    let service = &app.state.operation_service;

    let preparing = service.set_status(id, 8, order.order_id, OrderStatus::Preparing).await.unwrap();
    assert_eq!(preparing.status, OrderStatus::Preparing);

    // `closed` só via fechamento de conta.
    let err = service.set_status(id, 8, order.order_id, OrderStatus::Closed).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    service.cancel_order(id, 8, order.order_id).await.unwrap();
    let err = service.set_status(id, 8, order.order_id, OrderStatus::Pending).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn concurrent_closures_of_one_table_produce_one_sale() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let chopp = app.product(id, "Chopp", 1000, 50).await;

    app.order(id, 9, &[(chopp.id, 2, 1000)]).await;
    app.order(id, 9, &[(chopp.id, 1, 1000)]).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = app.state.operation_service.clone();
        handles.push(tokio::spawn(async move { service.close_table(id, 9, &close_with(0)).await }));
    }

    let mut ok = 0;
    let mut nothing = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(closure) => {
                ok += 1;
                assert_eq!(closure.gross_total, Money::from_cents(3000));
            }
            Err(AppError::NothingToClose(9)) => nothing += 1,
            Err(other) => panic!("erro inesperado: {other:?}"),
        }
    }
    assert_eq!((ok, nothing), (1, 1));
    assert_eq!(app.stock_of(id, chopp.id).await, 47);

    let totals = app.state.dashboard_service.get_totals(id).await.unwrap();
    assert_eq!(totals.sales_count, 1);
}

#[tokio::test]
async fn staff_calls_are_listed_until_attended() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let service = &app.state.operation_service;

    let call = service.call_staff(id, 3).await.unwrap();
    assert_eq!(service.list_pending_calls(id).await.unwrap().len(), 1);

    let attended = service.attend_call(id, call.id).await.unwrap();
    assert!(attended.attended_at.is_some());
    assert!(service.list_pending_calls(id).await.unwrap().is_empty());

    let err = service.attend_call(id, 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn failed_closure_leaves_no_trace() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let chopp = app.product(id, "Chopp", 1000, 20).await;

    app.order(id, 5, &[(chopp.id, 2, 1000)]).await;
    app.order(id, 5, &[(chopp.id, 1, 1000)]).await;

    // Faz o último passo (acumulados) falhar depois da venda, dos itens e do estoque.
    let store = app.state.registry.store(id).await.unwrap();
    sqlx::raw_sql(
        "CREATE TRIGGER bloqueia_totais_ins BEFORE INSERT ON company_totals
             BEGIN SELECT RAISE(ABORT, 'acumulados bloqueados'); END;
         CREATE TRIGGER bloqueia_totais_upd BEFORE UPDATE ON company_totals
             BEGIN SELECT RAISE(ABORT, 'acumulados bloqueados'); END;",
    )
    .execute(&store)
    .await
    .unwrap();

    let err = app
        .state
        .operation_service
        .close_table(id, 5, &close_with(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)), "veio {err:?}");

    let sales = app
        .state
        .sales_service
        .list_sales(id, &SalesQuery::default())
        .await
        .unwrap();
    assert!(sales.is_empty());
    assert_eq!(app.stock_of(id, chopp.id).await, 20);
    assert_eq!(app.state.dashboard_service.get_totals(id).await.unwrap().sales_count, 0);

    let orders = app.state.operation_service.list_orders(id, 5).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.order.status == OrderStatus::Pending));

    // Sem o bloqueio, a mesma mesa fecha normalmente.
    sqlx::raw_sql("DROP TRIGGER bloqueia_totais_ins; DROP TRIGGER bloqueia_totais_upd;")
        .execute(&store)
        .await
        .unwrap();
    let closure = app
        .state
        .operation_service
        .close_table(id, 5, &close_with(0))
        .await
        .unwrap();
    assert_eq!(closure.gross_total, Money::from_cents(3000));
    assert_eq!(app.stock_of(id, chopp.id).await, 17);
}

#[tokio::test]
async fn oversized_order_is_rejected_without_panicking() {
    let app = spawn_app().await;
    let id = app.provision("Bar", "admin@bar.com").await.company.id;
    let chopp = app.product(id, "Chopp", 1000, 20).await;

    let payload = CreateOrderPayload {
        items: vec![OrderLinePayload {
            product_id: chopp.id,
            quantity: i64::MAX,
            unit_price: Money::new(rust_decimal::Decimal::MAX),
            notes: None,
        }],
        customer_name: None,
        notes: None,
    };
    let err = app
        .state
        .operation_service
        .create_order(id, 1, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let summary = app.state.operation_service.table_summary(id, 1).await.unwrap();
    assert_eq!(summary.open_orders, 0);
}
