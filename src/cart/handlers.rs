//! REST API handlers for cart operations
//!
//! Thin HTTP layer over the cart store: resolves the session, delegates to
//! the core, and maps errors to responses. Contains no business rules.

use super::models::*;
use super::store::{Cart, CartError};
use crate::checkout::summary::compute_summary;
use crate::session::{resolve_session_id, with_session_cookie, SharedState};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::Query, extract::State, Json, Router};
use serde::Deserialize;
use serde_json::json;

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(cart_state))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/remove", post(remove_from_cart))
        .route("/cart/update_quantity", post(update_quantity))
        .route("/cart/clear", post(clear_cart))
}

/// Query parameters accepted by `GET /cart`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionQuery {
    #[serde(default)]
    session_id: Option<String>,
}

/// Builds the response body for a cart, including the derived summary.
fn cart_view(cart: &Cart) -> CartView {
    CartView {
        items: cart.items().to_vec(),
        total_items: cart.total_items(),
        total_price: cart.total_price(),
        summary: compute_summary(cart),
    }
}

fn cart_response(view: CartView, session_id: &str, is_new: bool) -> Response {
    with_session_cookie(Json(view).into_response(), session_id, is_new)
}

fn cart_error_response(err: CartError, session_id: &str, is_new: bool) -> Response {
    let CartError::StockExceeded {
        product_id,
        requested,
        available,
    } = &err;
    let body = json!({
        "error": err.to_string(),
        "code": "stockExceeded",
        "productId": product_id,
        "requested": requested,
        "available": available,
    });
    with_session_cookie(
        (StatusCode::CONFLICT, Json(body)).into_response(),
        session_id,
        is_new,
    )
}

/// Endpoint: GET /cart
/// Returns the cart contents and derived totals for the session.
async fn cart_state(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<SessionQuery>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, query.session_id);
    let session = state.sessions.entry(session_id.clone()).or_default();
    let view = cart_view(&session.cart);
    drop(session);

    cart_response(view, &session_id, is_new)
}

/// Endpoint: POST /cart/add
/// Adds a product to the session's cart, aggregating quantities for
/// products already present.
async fn add_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddToCartInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    let result = session.cart.add(payload.product, payload.quantity);
    let view = cart_view(&session.cart);
    drop(session);

    match result {
        Ok(()) => cart_response(view, &session_id, is_new),
        Err(err) => cart_error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /cart/remove
/// Removes a product from the cart. Unknown ids are a no-op.
async fn remove_from_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<RemoveFromCartInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    session.cart.remove(&payload.product_id);
    let view = cart_view(&session.cart);
    drop(session);

    cart_response(view, &session_id, is_new)
}

/// Endpoint: POST /cart/update_quantity
/// Sets a product's quantity; zero or negative removes it.
async fn update_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateQuantityInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    let result = session
        .cart
        .update_quantity(&payload.product_id, payload.quantity);
    let view = cart_view(&session.cart);
    drop(session);

    match result {
        Ok(()) => cart_response(view, &session_id, is_new),
        Err(err) => cart_error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /cart/clear
/// Empties the session's cart.
async fn clear_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ClearCartInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    session.cart.clear();
    let view = cart_view(&session.cart);
    drop(session);

    cart_response(view, &session_id, is_new)
}
