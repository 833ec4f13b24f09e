mod common;

use std::sync::Arc;

use pdv_backend::{
    common::{error::AppError, money::Money},
    db::TenantRegistry,
    models::{
        auth::{Claims, DemoSignupPayload},
        lifecycle::Lifecycle,
    },
};

use common::{spawn_app, spawn_app_with, ADMIN_PASSWORD, JWT_SECRET};

#[tokio::test]
async fn companies_never_see_each_others_rows() {
    let app = spawn_app().await;
    let padaria = app.provision("Padaria", "dono@padaria.com").await;
    let bar = app.provision("Bar", "dono@bar.com").await;
    let (a, b) = (padaria.company.id, bar.company.id);

    let pao = app.product(a, "Pão", 150, 100).await;

    let b_products = app.state.inventory_service.list_products(b, true).await.unwrap();
    assert!(b_products.is_empty());

    let err = app.state.inventory_service.get_product(b, pao.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(app.dir.path().join(format!("company_{a}.db")).exists());
    assert!(app.dir.path().join(format!("company_{b}.db")).exists());
}

#[tokio::test]
async fn concurrent_first_access_opens_a_single_store() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(TenantRegistry::new(dir.path(), 1));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move { registry.store(99).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(registry.open_count(), 1);
    assert!(dir.path().join("company_99.db").exists());
}

#[tokio::test]
async fn non_positive_tenant_is_rejected_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let registry = TenantRegistry::new(dir.path(), 1);

    let err = registry.store(0).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTenant(_)));
    assert_eq!(registry.open_count(), 0);
    assert!(!dir.path().join("company_0.db").exists());
}

#[tokio::test]
async fn disabling_a_company_revokes_issued_tokens() {
    let app = spawn_app().await;
    let loja = app.provision("Loja", "admin@loja.com").await;

    let login = app
        .state
        .auth_service
        .login_user("admin@loja.com", ADMIN_PASSWORD)
        .await
        .unwrap();
    let ctx = app.state.auth_service.authenticate(&login.token).await.unwrap();
    assert_eq!(ctx.company_id, loja.company.id);

    app.state
        .tenant_service
        .set_company_lifecycle(loja.company.id, Lifecycle::Disabled)
        .await
        .unwrap();

    let err = app.state.auth_service.authenticate(&login.token).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let err = app
        .state
        .auth_service
        .login_user("admin@loja.com", ADMIN_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn expired_demo_is_rejected_on_login_and_on_every_request() {
    let app = spawn_app_with(|config| config.demo_days = -1).await;

    let signup = app
        .state
        .auth_service
        .demo_signup(&DemoSignupPayload {
            company_name: "Teste Grátis".to_string(),
            name: "Visitante".to_string(),
            email: "visitante@demo.com".to_string(),
            password: "senha-demo".to_string(),
        })
        .await
        .unwrap();
    assert!(signup.user.is_demo);

    let err = app.state.auth_service.authenticate(&signup.token).await.unwrap_err();
    assert!(matches!(err, AppError::DemoExpired));

    let err = app
        .state
        .auth_service
        .login_user("visitante@demo.com", "senha-demo")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DemoExpired));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let app = spawn_app().await;
    app.provision("Loja", "admin@loja.com").await;

    let err = app
        .state
        .auth_service
        .login_user("admin@loja.com", "outra-senha")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn master_panel_lists_totals_from_each_store() {
    let app = spawn_app().await;
    let loja = app.provision("Loja", "admin@loja.com").await;
    let id = loja.company.id;
    let suco = app.product(id, "Suco", 800, 10).await;

    app.order(id, 3, &[(suco.id, 2, 800)]).await;
    app.state
        .operation_service
        .close_table(id, 3, &serde_json::from_value(serde_json::json!({ "paymentMethod": "pix" })).unwrap())
        .await
        .unwrap();

    let overview = app.state.tenant_service.get_company(id).await.unwrap();
    assert_eq!(overview.sales_count, 1);
    assert_eq!(overview.total_sales, Money::from_cents(1600));
}

#[tokio::test]
async fn tokens_last_a_week_by_default() {
    let app = spawn_app().await;
    app.provision("Loja", "admin@loja.com").await;

    let login = app
        .state
        .auth_service
        .login_user("admin@loja.com", ADMIN_PASSWORD)
        .await
        .unwrap();
    let claims = jsonwebtoken::decode::<Claims>(
        &login.token,
        &jsonwebtoken::DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(claims.exp - claims.iat, 168 * 3600);
}
