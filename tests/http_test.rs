mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pdv_backend::{models::lifecycle::Lifecycle, routes::app_router};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{spawn_app, TestApp, ADMIN_PASSWORD};

fn router(app: &TestApp) -> Router {
    app_router(app.state.clone())
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &TestApp, email: &str) -> String {
    let (status, body) = send(
        router(app),
        post_json("/api/auth/login", None, json!({ "email": email, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login falhou: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_answers_ok() {
    let app = spawn_app().await;
    let (status, body) = send(router(&app), get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = spawn_app().await;

    let (status, body) = send(router(&app), get("/api/products", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(router(&app), get("/api/products", Some("nao-e-um-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn query_company_is_replaced_by_the_token_company() {
    let app = spawn_app().await;
    let padaria = app.provision("Padaria", "dono@padaria.com").await.company.id;
    let bar = app.provision("Bar", "dono@bar.com").await.company.id;
    app.product(padaria, "Pão", 150, 100).await;
    app.product(bar, "Chopp", 1000, 50).await;

    let token = login(&app, "dono@padaria.com").await;

    let uri = format!("/api/products?company_id={bar}");
    let (status, body) = send(router(&app), get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Pão");
    assert_eq!(products[0]["companyId"], padaria);
}

#[tokio::test]
async fn body_naming_another_company_is_forbidden() {
    let app = spawn_app().await;
    let padaria = app.provision("Padaria", "dono@padaria.com").await.company.id;
    let bar = app.provision("Bar", "dono@bar.com").await.company.id;
    let token = login(&app, "dono@padaria.com").await;

    let (status, body) = send(
        router(&app),
        post_json(
            "/api/products",
            Some(&token),
            json!({ "name": "Intruso", "price": 10.0, "stock": 1, "companyId": bar }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = send(
        router(&app),
        post_json(
            "/api/products",
            Some(&token),
            json!({ "name": "Sonho", "price": 6.5, "stock": 12, "companyId": padaria }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(app.state.inventory_service.list_products(bar, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_is_rejected_over_http() {
    let app = spawn_app().await;
    app.provision("Padaria", "dono@padaria.com").await;

    let (status, body) = send(
        router(&app),
        post_json(
            "/api/auth/login",
            None,
            json!({ "email": "dono@padaria.com", "password": "chute-errado" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn public_menu_requires_an_active_company() {
    let app = spawn_app().await;
    let id = app.provision("Cantina", "dono@cantina.com").await.company.id;
    app.product(id, "Lasanha", 3200, 5).await;

    let uri = format!("/api/public/companies/{id}/products");
    let (status, body) = send(router(&app), get(&uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    app.state
        .tenant_service
        .set_company_lifecycle(id, Lifecycle::Disabled)
        .await
        .unwrap();

    let (status, _) = send(router(&app), get(&uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(router(&app), get("/api/public/companies/0/products", None)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn closing_an_empty_table_is_a_conflict() {
    let app = spawn_app().await;
    app.provision("Bar", "dono@bar.com").await;
    let token = login(&app, "dono@bar.com").await;

    let (status, body) = send(
        router(&app),
        post_json("/api/tables/12/close", Some(&token), json!({ "paymentMethod": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOTHING_TO_CLOSE");
}

#[tokio::test]
async fn absurd_public_order_is_a_bad_request() {
    let app = spawn_app().await;
    let id = app.provision("Cantina", "dono@cantina.com").await.company.id;
    let lasanha = app.product(id, "Lasanha", 3200, 5).await;

    let uri = format!("/api/public/companies/{id}/tables/3/orders");
    let (status, body) = send(
        router(&app),
        post_json(
            &uri,
            None,
            json!({ "items": [{ "productId": lasanha.id, "quantity": 1_000_000, "unitPrice": 1e25 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        router(&app),
        post_json(
            &uri,
            None,
            json!({ "items": [{ "productId": lasanha.id, "quantity": 2, "unitPrice": 32.0 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
