//! Cart endpoints over real HTTP.
//!
//! Each test starts its own storefront on an ephemeral port; no external
//! services are needed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use ninja_cats_core::{CartSessionId, OrderSnapshot, ProductId};
use ninja_cats_integration_tests::TestServer;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const CART_PATHS: [&str; 5] = [
    "create-cart-session",
    "get-cart-items",
    "add-cart-item",
    "remove-cart-item",
    "create-order",
];

async fn post(client: &Client, server: &TestServer, path: &str, body: Value) -> (StatusCode, String) {
    let resp = client
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    (status, resp.text().await.expect("body"))
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::spawn(OrderSnapshot::MarkerOnly).await;
    let client = Client::new();

    let resp = client.get(server.url("health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client.get(server.url("health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_page_loads_cart_script() {
    let server = TestServer::spawn(OrderSnapshot::MarkerOnly).await;
    let client = Client::new();

    let page = client.get(server.url("")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("/static/cart.js"));

    let resp = client.get(server.url("static/cart.js")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let script = resp.text().await.unwrap();
    assert!(script.contains("cartSessionId"));
    for path in CART_PATHS {
        assert!(script.contains(&format!("\"/{path}\"")), "{path}");
    }
}

#[tokio::test]
async fn test_non_post_methods_get_405_json() {
    let server = TestServer::spawn(OrderSnapshot::MarkerOnly).await;
    let client = Client::new();

    for path in CART_PATHS {
        for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
            let resp = client
                .request(method.clone(), server.url(path))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} /{path}");

            let body: Value = resp.json().await.unwrap();
            assert_eq!(
                body,
                json!({
                    "status": 405,
                    "statusText": "Method Not Allowed",
                    "error": "This endpoint requires a POST request."
                }),
                "{method} /{path}"
            );
        }
    }
}

#[tokio::test]
async fn test_cart_lifecycle() {
    let server = TestServer::spawn(OrderSnapshot::LineItems).await;
    let client = Client::new();
    let session = CartSessionId::generate();

    let (status, body) = post(&client, &server, "create-cart-session", json!({ "id": session })).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], 201);
    assert_eq!(body["statusText"], "Created");

    for product in ["course-stealth", "course-pounce", "course-stealth"] {
        let (status, _) = post(
            &client,
            &server,
            "add-cart-item",
            json!({ "product_id": product, "cart_session_id": session }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = post(&client, &server, "get-cart-items", json!({ "id": session })).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({ "cartItems": ["course-stealth", "course-pounce"] }));

    let (status, body) = post(
        &client,
        &server,
        "remove-cart-item",
        json!({ "product_id": "course-pounce", "cart_session_id": session }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = post(&client, &server, "create-order", json!({ "cart_session_id": session })).await;
    assert_eq!(status, StatusCode::CREATED);

    let orders = server.store.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].cart_session_id, session);
    assert_eq!(orders[0].line_items, vec![ProductId::from("course-stealth")]);
}

#[tokio::test]
async fn test_unknown_session_reads_as_empty_cart() {
    let server = TestServer::spawn(OrderSnapshot::MarkerOnly).await;
    let client = Client::new();

    let (status, body) = post(
        &client,
        &server,
        "get-cart-items",
        json!({ "id": CartSessionId::generate() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "cartItems": [] }));
}

#[tokio::test]
async fn test_conflicts_and_bad_requests() {
    let server = TestServer::spawn(OrderSnapshot::MarkerOnly).await;
    let client = Client::new();
    let session = CartSessionId::generate();

    let (status, _) = post(&client, &server, "create-cart-session", json!({ "id": session })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = post(&client, &server, "create-cart-session", json!({ "id": session })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], 409);
    assert!(body["error"].is_string());

    let (status, _) = post(
        &client,
        &server,
        "add-cart-item",
        json!({ "product_id": "course-stealth", "cart_session_id": CartSessionId::generate() }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post(&client, &server, "create-order", json!({ "cart_session_id": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["status"], 400);
}
