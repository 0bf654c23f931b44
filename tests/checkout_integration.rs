//! Integration tests for the storefront checkout REST API
//!
//! These tests drive the full axum router end to end:
//! - Cart mutations and derived totals
//! - The empty-cart guard on the checkout wizard
//! - The shipping → payment → review → confirmation walk
//! - Validation errors surfaced as field-scoped messages
//! - Session isolation and the session cookie

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use storefront_checkout::config::Config;
use storefront_checkout::router::create_app_router;
use storefront_checkout::session::AppState;

/// Helper function to create a test app instance with the given simulated
/// processing latency
fn create_app_with_latency(submit_latency: Duration) -> axum::Router {
    let config = Config {
        submit_latency,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config));
    create_app_router(state)
}

/// Helper function to create a test app instance with no simulated latency
fn create_test_app() -> axum::Router {
    create_app_with_latency(Duration::ZERO)
}

/// Helper function to send a JSON request and get the response
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

fn product(id: &str, price: f64, stock: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Product {}", id),
        "price": price,
        "stock": stock,
        "category": "widgets",
        "rating": 4.5,
        "reviews": 12,
        "image": "widget.png",
        "description": "A widget"
    })
}

fn shipping_form() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@example.com",
        "phone": "+1 (555) 123-4567",
        "address": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "zipCode": "62704",
        "country": "United States"
    })
}

fn payment_form() -> Value {
    json!({
        "cardholderName": "Jane Doe",
        "cardNumber": "4111 1111 1111 1111",
        "expiryDate": "12/49",
        "cvv": "123"
    })
}

async fn add_product(app: &axum::Router, session: &str, id: &str, price: f64, quantity: u32) {
    let (status, _) = send_request(
        app,
        "POST",
        "/cart/add",
        Some(json!({
            "product": product(id, price, 100),
            "quantity": quantity,
            "sessionId": session
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cart_add_aggregates_same_product() {
    let app = create_test_app();

    add_product(&app, "s1", "p1", 10.0, 2).await;
    add_product(&app, "s1", "p1", 10.0, 3).await;

    let (status, body) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(body["totalItems"], 5);
    assert_eq!(body["totalPrice"], 50.0);
}

#[tokio::test]
async fn test_cart_view_includes_summary() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 25.0, 2).await;

    let (_, body) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    assert_eq!(body["summary"]["subtotal"], 50.0);
    assert_eq!(body["summary"]["shipping"], 15.0);
    assert_eq!(body["summary"]["tax"], 4.0);
    assert_eq!(body["summary"]["total"], 69.0);
}

#[tokio::test]
async fn test_cart_free_shipping_above_threshold() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 75.0, 2).await;

    let (_, body) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    assert_eq!(body["summary"]["shipping"], 0.0);
    assert_eq!(body["summary"]["total"], 162.0);
}

#[tokio::test]
async fn test_cart_update_quantity_and_remove() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 10.0, 2).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/cart/update_quantity",
        Some(json!({ "productId": "p1", "quantity": 7, "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 7);

    // Zero removes the item
    let (_, body) = send_request(
        &app,
        "POST",
        "/cart/update_quantity",
        Some(json!({ "productId": "p1", "quantity": 0, "sessionId": "s1" })),
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Negative behaves like zero
    add_product(&app, "s1", "p1", 10.0, 2).await;
    let (_, body) = send_request(
        &app,
        "POST",
        "/cart/update_quantity",
        Some(json!({ "productId": "p1", "quantity": -1, "sessionId": "s1" })),
    )
    .await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cart_remove_unknown_product_is_noop() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 10.0, 2).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/cart/remove",
        Some(json!({ "productId": "missing", "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cart_add_beyond_stock_is_rejected() {
    let app = create_test_app();

    let (status, _) = send_request(
        &app,
        "POST",
        "/cart/add",
        Some(json!({
            "product": product("p1", 10.0, 3),
            "quantity": 2,
            "sessionId": "s1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_request(
        &app,
        "POST",
        "/cart/add",
        Some(json!({
            "product": product("p1", 10.0, 3),
            "quantity": 2,
            "sessionId": "s1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "stockExceeded");
    assert_eq!(body["available"], 3);

    // Cart unchanged
    let (_, body) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    assert_eq!(body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_checkout_blocked_for_empty_cart() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "GET", "/checkout?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "emptyCart");

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "emptyCart");
}

#[tokio::test]
async fn test_incomplete_shipping_form_keeps_step_and_reports_email() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 10.0, 1).await;

    let mut form = shipping_form();
    form["email"] = json!("");

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": form, "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let errors = body["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e["field"] == "email"));

    let (status, body) = send_request(&app, "GET", "/checkout?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 0);
    assert!(body["shippingInfo"].is_null());
}

#[tokio::test]
async fn test_full_checkout_walk() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 50.0, 1).await;

    // Shipping → Payment
    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 1);
    assert_eq!(body["shippingInfo"]["email"], "jane@example.com");

    // Payment → Review; only the card's last four digits are echoed back
    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/payment",
        Some(json!({ "payment": payment_form(), "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 2);
    assert_eq!(body["cardLast4"], "1111");

    // Review → Confirmation; cart is cleared as a side effect
    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/place_order",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 3);
    let order_number = body["orderNumber"].as_str().unwrap().to_string();
    assert!(order_number.starts_with("ORD-"));

    let (_, cart) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);

    // Confirmation is reachable with an empty cart
    let (status, body) = send_request(&app, "GET", "/checkout?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 3);
    assert_eq!(body["orderNumber"].as_str().unwrap(), order_number);
}

#[tokio::test]
async fn test_back_keeps_data_and_shipping_has_no_back() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 50.0, 1).await;

    send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/back",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 0);
    assert_eq!(body["shippingInfo"]["firstName"], "Jane");

    // Back from the shipping step is rejected
    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/back",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalidTransition");
}

#[tokio::test]
async fn test_restart_after_confirmation_resets_everything() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 50.0, 1).await;

    send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;
    send_request(
        &app,
        "POST",
        "/checkout/payment",
        Some(json!({ "payment": payment_form(), "sessionId": "s1" })),
    )
    .await;
    send_request(
        &app,
        "POST",
        "/checkout/place_order",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/restart",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 0);
    assert!(body["shippingInfo"].is_null());
    assert!(body["cardLast4"].is_null());
    assert_eq!(body["orderNumber"], "");

    // The cart stayed empty, so the wizard is gated again
    let (status, body) = send_request(&app, "GET", "/checkout?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "emptyCart");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = create_test_app();

    add_product(&app, "s1", "p1", 10.0, 5).await;
    add_product(&app, "s2", "p2", 3.0, 1).await;

    let (_, body1) = send_request(&app, "GET", "/cart?sessionId=s1", None).await;
    let (_, body2) = send_request(&app, "GET", "/cart?sessionId=s2", None).await;

    assert_eq!(body1["items"][0]["product"]["id"], "p1");
    assert_eq!(body1["totalItems"], 5);
    assert_eq!(body2["items"][0]["product"]["id"], "p2");
    assert_eq!(body2["totalItems"], 1);
}

#[tokio::test]
async fn test_new_session_gets_a_cookie() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/cart")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("cart_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_payment_validation_errors_are_field_scoped() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 50.0, 1).await;

    send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;

    let mut form = payment_form();
    form["cardNumber"] = json!("123");
    form["cvv"] = json!("12345");

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/payment",
        Some(json!({ "payment": form, "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["cardNumber", "cvv"]);
}

#[tokio::test]
async fn test_second_submit_during_processing_window_is_rejected() {
    let app = create_app_with_latency(Duration::from_millis(200));
    add_product(&app, "s1", "p1", 50.0, 1).await;

    let first_app = app.clone();
    let first = tokio::spawn(async move {
        send_request(
            &first_app,
            "POST",
            "/checkout/shipping",
            Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
        )
        .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "submissionInProgress");

    let (status, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 1);
}

#[tokio::test]
async fn test_aborted_submit_releases_the_in_flight_flag() {
    let app = create_app_with_latency(Duration::from_millis(200));
    add_product(&app, "s1", "p1", 50.0, 1).await;

    // Client disconnects mid-submission: the handler future is dropped
    // inside the processing window.
    let aborted_app = app.clone();
    let aborted = tokio::spawn(async move {
        send_request(
            &aborted_app,
            "POST",
            "/checkout/shipping",
            Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
        )
        .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    aborted.abort();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The abandoned submission must not wedge the session.
    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/shipping",
        Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], 1);
}

#[tokio::test]
async fn test_cart_cleared_during_processing_window_blocks_advance() {
    let app = create_app_with_latency(Duration::from_millis(200));
    add_product(&app, "s1", "p1", 50.0, 1).await;

    let submit_app = app.clone();
    let submit = tokio::spawn(async move {
        send_request(
            &submit_app,
            "POST",
            "/checkout/shipping",
            Some(json!({ "shipping": shipping_form(), "sessionId": "s1" })),
        )
        .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let (status, _) = send_request(
        &app,
        "POST",
        "/cart/clear",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The in-flight submission resolves against the now-empty cart and
    // must not advance the wizard.
    let (status, body) = submit.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "emptyCart");

    let (status, body) = send_request(&app, "GET", "/checkout?sessionId=s1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "emptyCart");
}

#[tokio::test]
async fn test_place_order_before_review_is_rejected() {
    let app = create_test_app();
    add_product(&app, "s1", "p1", 50.0, 1).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/checkout/place_order",
        Some(json!({ "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalidTransition");
}
