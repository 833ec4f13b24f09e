mod common;

use std::path::Path;

use pdv_backend::{
    common::money::Money,
    db::legacy_repo::{LegacyRepository, LEGACY_MARKER},
    models::{lifecycle::Lifecycle, sales::PaymentMethod, sales::SalesQuery},
    services::migration_service::open_legacy_store,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};

use common::spawn_app;

// Esquema da versão antiga: um banco só, valores em reais (REAL) e flag `active`.
const LEGACY_SCHEMA: &str = r#"
CREATE TABLE products (
    id INTEGER PRIMARY KEY, company_id INTEGER, name TEXT, description TEXT, category TEXT,
    price REAL, stock INTEGER, barcode TEXT, active INTEGER, created_at TEXT, updated_at TEXT
);
CREATE TABLE customers (
    id INTEGER PRIMARY KEY, company_id INTEGER, name TEXT, cpf TEXT, email TEXT, phone TEXT,
    address TEXT, created_at TEXT, updated_at TEXT
);
CREATE TABLE employees (
    id INTEGER PRIMARY KEY, company_id INTEGER, name TEXT, role TEXT, email TEXT, phone TEXT,
    password_hash TEXT, active INTEGER, created_at TEXT, updated_at TEXT
);
CREATE TABLE sales (
    id INTEGER PRIMARY KEY, company_id INTEGER, customer_id INTEGER, total REAL, discount REAL,
    payment_method TEXT, notes TEXT, created_at TEXT
);
CREATE TABLE sale_items (
    id INTEGER PRIMARY KEY, sale_id INTEGER, product_id INTEGER, quantity INTEGER,
    unit_price REAL, subtotal REAL
);
CREATE TABLE cash_closures (
    id INTEGER PRIMARY KEY, company_id INTEGER, employee_id INTEGER, opened_at TEXT, closed_at TEXT,
    cash REAL, card REAL, pix REAL, notes TEXT
);
CREATE TABLE table_orders (
    id INTEGER PRIMARY KEY, table_number INTEGER, status TEXT, total REAL, customer_name TEXT,
    notes TEXT, created_at TEXT, updated_at TEXT
);
CREATE TABLE table_order_items (
    id INTEGER PRIMARY KEY, order_id INTEGER, product_id INTEGER, quantity INTEGER,
    unit_price REAL, subtotal REAL, notes TEXT
);
"#;

/// Cria o banco antigo com o esquema completo e executa `rows` nele.
async fn write_legacy(path: &Path, rows: &str) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(LEGACY_SCHEMA).execute(&mut conn).await.unwrap();
    sqlx::raw_sql(rows).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();
}

async fn write_legacy_db(path: &Path, a: i64, b: i64) {
    let ts = "2024-03-01T12:00:00+00:00";
    let data = format!(
        r#"
        INSERT INTO products VALUES (1, {a}, 'X-Burguer', NULL, 'Lanches', 12.5, 30, '789001', 1, '{ts}', '{ts}');
        INSERT INTO products VALUES (2, {a}, 'Refri Lata', NULL, 'Bebidas', 5.99, 0, NULL, 0, '{ts}', '{ts}');
        INSERT INTO products VALUES (3, {b}, 'Pastel', NULL, NULL, 8.0, 12, NULL, 1, '{ts}', '{ts}');

        INSERT INTO customers VALUES (1, {a}, 'Ana', '12345678901', NULL, NULL, NULL, '{ts}', '{ts}');
        INSERT INTO employees VALUES (1, {a}, 'Beto', 'garcom', NULL, NULL, NULL, 1, '{ts}', '{ts}');

        INSERT INTO sales VALUES (1, {a}, 1, 25.0, 0, 'dinheiro', NULL, '{ts}');
        INSERT INTO sales VALUES (2, {a}, NULL, 17.49, 1.0, 'cartao', NULL, '{ts}');
        INSERT INTO sales VALUES (3, {b}, NULL, 8.0, 0, 'pix', NULL, '{ts}');
        INSERT INTO sale_items VALUES (1, 1, 1, 2, 12.5, 25.0);
        INSERT INTO sale_items VALUES (2, 2, 1, 1, 12.5, 12.5);
        INSERT INTO sale_items VALUES (3, 2, 2, 1, 5.99, 5.99);
        INSERT INTO sale_items VALUES (4, 3, 3, 1, 8.0, 8.0);

        INSERT INTO cash_closures VALUES (1, {a}, 1, '{ts}', '{ts}', 25.0, 17.49, 0, 'turno da noite');

        INSERT INTO table_orders VALUES (1, 4, 'pending', 25.0, 'Mesa da janela', NULL, '{ts}', '{ts}');
        INSERT INTO table_orders VALUES (2, 1, 'pending', 8.0, NULL, NULL, '{ts}', '{ts}');
        INSERT INTO table_order_items VALUES (1, 1, 1, 1, 12.5, 12.5, NULL);
        INSERT INTO table_order_items VALUES (2, 1, 1, 1, 12.5, 12.5, 'sem cebola');
        INSERT INTO table_order_items VALUES (3, 2, 3, 1, 8.0, 8.0, NULL);
        "#
    );
    write_legacy(path, &data).await;
}

#[tokio::test]
async fn legacy_data_is_copied_once_per_company() {
    let app = spawn_app().await;
    let a = app.provision("Lanchonete", "admin@lanchonete.com").await.company.id;
    let b = app.provision("Pastelaria", "admin@pastelaria.com").await.company.id;

    let legacy_path = app.dir.path().join("legacy.db");
    write_legacy_db(&legacy_path, a, b).await;
    let legacy = open_legacy_store(&legacy_path).await.unwrap().expect("legacy db");

    let reports = app.state.migration_service.run(&legacy).await.unwrap();
    let report_a = reports.iter().find(|r| r.company_id == a).expect("report A");
    assert!(!report_a.already_migrated);
    assert_eq!(report_a.products, 2);
    assert_eq!(report_a.customers, 1);
    assert_eq!(report_a.employees, 1);
    assert_eq!(report_a.sales, 2);
    assert_eq!(report_a.sale_items, 3);
    assert_eq!(report_a.cash_closures, 1);
    assert_eq!(report_a.table_orders, 1);
    assert_eq!(report_a.table_order_lines, 2);

    let report_b = reports.iter().find(|r| r.company_id == b).expect("report B");
    assert_eq!(report_b.products, 1);
    assert_eq!(report_b.table_orders, 1);

    // Reais viram centavos; `active = 0` vira produto desativado.
    let inventory = &app.state.inventory_service;
    let burger = inventory.get_product(a, 1).await.unwrap();
    assert_eq!(burger.price, Money::from_cents(1250));
    let refri = inventory.get_product(a, 2).await.unwrap();
    assert_eq!(refri.price, Money::from_cents(599));
    assert_eq!(refri.lifecycle, Lifecycle::Disabled);
    assert_eq!(inventory.list_products(a, false).await.unwrap().len(), 1);

    // Nada da outra empresa vaza.
    assert!(inventory.get_product(b, 1).await.is_err());

    let sales = app
        .state
        .sales_service
        .list_sales(a, &SalesQuery::default())
        .await
        .unwrap();
    assert_eq!(sales.len(), 2);
    assert!(sales.iter().any(|s| s.payment_method == PaymentMethod::Cash));
    assert!(sales.iter().any(|s| s.payment_method == PaymentMethod::Card));

    let totals = app.state.dashboard_service.get_totals(a).await.unwrap();
    assert_eq!(totals.sales_count, 2);
    assert_eq!(totals.total_sales, Money::from_cents(2500 + 1749));

    let summary = app.state.operation_service.table_summary(a, 4).await.unwrap();
    assert_eq!(summary.open_orders, 1);
    assert_eq!(summary.total, Money::from_cents(2500));

    // Segunda execução: o marcador impede qualquer nova inserção.
    let again = app.state.migration_service.run(&legacy).await.unwrap();
    assert!(again.iter().all(|r| r.already_migrated));
    assert_eq!(again.iter().map(|r| r.inserted()).sum::<u64>(), 0);
    assert_eq!(app.state.dashboard_service.get_totals(a).await.unwrap().sales_count, 2);
}

#[tokio::test]
async fn missing_legacy_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = open_legacy_store(&dir.path().join("nao-existe.db")).await.unwrap();
    assert!(legacy.is_none());
}

#[tokio::test]
async fn legacy_without_table_orders_still_migrates_the_rest() {
    let app = spawn_app().await;
    let a = app.provision("Lanchonete", "admin@lanchonete.com").await.company.id;

    let legacy_path = app.dir.path().join("antigo.db");
    let mut conn = SqliteConnectOptions::new()
        .filename(&legacy_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY, company_id INTEGER, name TEXT, description TEXT, category TEXT,
            price REAL, stock INTEGER, barcode TEXT, active INTEGER, created_at TEXT, updated_at TEXT
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO products VALUES (7, ?, 'Coxinha', NULL, NULL, 6.5, 40, NULL, 1,
                '2024-03-01T12:00:00+00:00', '2024-03-01T12:00:00+00:00')",
    )
    .bind(a)
    .execute(&mut conn)
    .await
    .unwrap();
    conn.close().await.unwrap();

    let legacy = open_legacy_store(&legacy_path).await.unwrap().expect("legacy db");
    let report = app.state.migration_service.migrate_company(&legacy, a).await.unwrap();

    assert_eq!(report.products, 1);
    assert_eq!(report.sales, 0);
    assert_eq!(report.table_orders, 0);
    assert_eq!(app.stock_of(a, 7).await, 40);
}

#[tokio::test]
async fn orphan_references_become_null() {
    let app = spawn_app().await;
    let a = app.provision("Lanchonete", "admin@lanchonete.com").await.company.id;

    let ts = "2024-03-01T12:00:00+00:00";
    let legacy_path = app.dir.path().join("orfaos.db");
    write_legacy(
        &legacy_path,
        &format!(
            r#"
            INSERT INTO products VALUES (1, {a}, 'X-Burguer', NULL, NULL, 12.5, 30, NULL, 1, '{ts}', '{ts}');
            INSERT INTO sales VALUES (1, {a}, 42, 12.5, 0, 'pix', NULL, '{ts}');
            INSERT INTO sale_items VALUES (1, 1, 1, 1, 12.5, 12.5);
            INSERT INTO cash_closures VALUES (1, {a}, 77, '{ts}', '{ts}', 12.5, 0, 0, NULL);
            "#
        ),
    )
    .await;

    let legacy = open_legacy_store(&legacy_path).await.unwrap().expect("legacy db");
    let report = app.state.migration_service.migrate_company(&legacy, a).await.unwrap();
    assert_eq!(report.products, 1);
    assert_eq!(report.sales, 1);
    assert_eq!(report.cash_closures, 1);

    let sale = app.state.sales_service.get_sale(a, 1).await.unwrap();
    assert_eq!(sale.sale.customer_id, None);
    let closures = app.state.finance_service.list_cash_closures(a).await.unwrap();
    assert_eq!(closures[0].employee_id, None);
}

#[tokio::test]
async fn blank_barcodes_do_not_collide() {
    let app = spawn_app().await;
    let a = app.provision("Lanchonete", "admin@lanchonete.com").await.company.id;

    let ts = "2024-03-01T12:00:00+00:00";
    let legacy_path = app.dir.path().join("sem-codigo.db");
    write_legacy(
        &legacy_path,
        &format!(
            r#"
            INSERT INTO products VALUES (1, {a}, 'Coxinha', NULL, NULL, 6.5, 40, '', 1, '{ts}', '{ts}');
            INSERT INTO products VALUES (2, {a}, 'Empada', NULL, NULL, 7.0, 25, '  ', 1, '{ts}', '{ts}');
            INSERT INTO products VALUES (3, {a}, 'Quibe', NULL, NULL, 6.0, 10, '789002', 1, '{ts}', '{ts}');
            INSERT INTO customers VALUES (1, {a}, 'Ana', '', NULL, NULL, NULL, '{ts}', '{ts}');
            INSERT INTO customers VALUES (2, {a}, 'Bia', '', NULL, NULL, NULL, '{ts}', '{ts}');
            "#
        ),
    )
    .await;

    let legacy = open_legacy_store(&legacy_path).await.unwrap().expect("legacy db");
    let report = app.state.migration_service.migrate_company(&legacy, a).await.unwrap();
    assert_eq!(report.products, 3);
    assert_eq!(report.customers, 2);

    let coxinha = app.state.inventory_service.get_product(a, 1).await.unwrap();
    assert_eq!(coxinha.barcode, None);
}

#[tokio::test]
async fn one_broken_company_does_not_block_the_others() {
    let app = spawn_app().await;
    let a = app.provision("Lanchonete", "admin@lanchonete.com").await.company.id;
    let b = app.provision("Pastelaria", "admin@pastelaria.com").await.company.id;

    let ts = "2024-03-01T12:00:00+00:00";
    let legacy_path = app.dir.path().join("quebrado.db");
    write_legacy(
        &legacy_path,
        &format!(
            r#"
            INSERT INTO products VALUES (1, {a}, 'X-Burguer', NULL, NULL, 12.5, 30, NULL, 1, '{ts}', '{ts}');
            INSERT INTO products VALUES (2, {b}, NULL, NULL, NULL, 8.0, 12, NULL, 1, '{ts}', '{ts}');
            "#
        ),
    )
    .await;
    let legacy = open_legacy_store(&legacy_path).await.unwrap().expect("legacy db");

    let reports = app.state.migration_service.run(&legacy).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].company_id, a);
    assert_eq!(reports[0].products, 1);

    let repo = LegacyRepository::new();
    let store_a = app.state.registry.store(a).await.unwrap();
    let store_b = app.state.registry.store(b).await.unwrap();
    assert!(repo.is_marked(&store_a, LEGACY_MARKER).await.unwrap());
    assert!(!repo.is_marked(&store_b, LEGACY_MARKER).await.unwrap());
    assert!(app.state.inventory_service.list_products(b, true).await.unwrap().is_empty());

    // Sem marcador, a próxima inicialização tenta de novo.
    assert!(app.state.migration_service.migrate_company(&legacy, b).await.is_err());
}
