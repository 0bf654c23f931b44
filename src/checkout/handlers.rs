//! REST API handlers for the checkout wizard
//!
//! Maps the wizard surface onto HTTP: resolves the session, enforces the
//! empty-cart entry guard, holds the submit-in-progress flag across the
//! simulated processing latency, and translates wizard errors to responses.

use super::models::{CheckoutError, CheckoutStep, PaymentInfo, ShippingInfo};
use super::wizard::CheckoutState;
use crate::session::{resolve_session_id, with_session_cookie, SharedState};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::Query, extract::State, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Creates routes for checkout-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/checkout", get(checkout_state))
        .route("/checkout/shipping", post(submit_shipping))
        .route("/checkout/payment", post(submit_payment))
        .route("/checkout/place_order", post(place_order))
        .route("/checkout/back", post(go_back))
        .route("/checkout/restart", post(restart))
}

/// Query parameters accepted by `GET /checkout`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionQuery {
    #[serde(default)]
    session_id: Option<String>,
}

/// Body for checkout operations that carry no form data
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SessionBody {
    session_id: Option<String>,
}

/// Input for `POST /checkout/shipping`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitShippingInput {
    #[serde(default)]
    shipping: ShippingInfo,
    #[serde(default)]
    session_id: Option<String>,
}

/// Input for `POST /checkout/payment`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitPaymentInput {
    #[serde(default)]
    payment: PaymentInfo,
    #[serde(default)]
    session_id: Option<String>,
}

/// Wizard state as rendered to the client. The stored card number is
/// reduced to its last four digits; the full value never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutView {
    step: u8,
    step_title: &'static str,
    shipping_info: Option<ShippingInfo>,
    card_last4: Option<String>,
    order_number: String,
}

impl CheckoutView {
    fn of(checkout: &CheckoutState) -> Self {
        Self {
            step: checkout.step().index(),
            step_title: checkout.step().title(),
            shipping_info: checkout.shipping_info().cloned(),
            card_last4: checkout.payment_info().map(|p| p.card_last4()),
            order_number: checkout.order_number().to_string(),
        }
    }
}

fn ok_response(view: CheckoutView, session_id: &str, is_new: bool) -> Response {
    with_session_cookie(Json(view).into_response(), session_id, is_new)
}

fn error_response(err: CheckoutError, session_id: &str, is_new: bool) -> Response {
    let response = match err {
        CheckoutError::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
        CheckoutError::EmptyCart => (
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string(), "code": "emptyCart" })),
        )
            .into_response(),
        CheckoutError::SubmissionInProgress => (
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string(), "code": "submissionInProgress" })),
        )
            .into_response(),
        CheckoutError::InvalidTransition { .. } => (
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string(), "code": "invalidTransition" })),
        )
            .into_response(),
    };
    with_session_cookie(response, session_id, is_new)
}

/// Clears the session's submit-in-progress flag when dropped.
///
/// The handler future can be dropped mid-flight (client disconnect during
/// the latency window); tying the flag to this guard ensures an abandoned
/// submission releases it instead of wedging the session. Must not be
/// dropped while the session entry is locked.
struct SubmitGuard {
    state: SharedState,
    session_id: String,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        if let Some(mut session) = self.state.sessions.get_mut(&self.session_id) {
            session.checkout.finish_submit();
        }
    }
}

/// Checks the empty-cart entry guard and marks a submission as in flight,
/// inside one short-lived lock on the session. The returned guard clears
/// the flag when dropped, whether the submission resolves or is abandoned.
fn begin_guarded_submit(
    state: &SharedState,
    session_id: &str,
) -> Result<SubmitGuard, CheckoutError> {
    let mut session = state.sessions.entry(session_id.to_string()).or_default();
    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        return Err(CheckoutError::EmptyCart);
    }
    session.checkout.begin_submit()?;
    drop(session);

    Ok(SubmitGuard {
        state: state.clone(),
        session_id: session_id.to_string(),
    })
}

/// Endpoint: GET /checkout
/// Returns the wizard state for the session. Steps below confirmation
/// require a non-empty cart.
async fn checkout_state(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<SessionQuery>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, query.session_id);
    let session = state.sessions.entry(session_id.clone()).or_default();

    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        drop(session);
        return error_response(CheckoutError::EmptyCart, &session_id, is_new);
    }

    let view = CheckoutView::of(&session.checkout);
    drop(session);
    ok_response(view, &session_id, is_new)
}

/// Endpoint: POST /checkout/shipping
/// Validates the shipping form and advances Shipping → Payment.
async fn submit_shipping(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitShippingInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);

    let guard = match begin_guarded_submit(&state, &session_id) {
        Ok(guard) => guard,
        Err(err) => return error_response(err, &session_id, is_new),
    };

    // Simulated processing delay; the in-flight flag blocks re-submission.
    tokio::time::sleep(state.config.submit_latency).await;
    drop(guard);

    let mut session = state.sessions.entry(session_id.clone()).or_default();
    // The cart may have been cleared during the latency window.
    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        drop(session);
        return error_response(CheckoutError::EmptyCart, &session_id, is_new);
    }
    let result = session.checkout.submit_shipping(payload.shipping);
    let view = CheckoutView::of(&session.checkout);
    drop(session);

    match result {
        Ok(()) => ok_response(view, &session_id, is_new),
        Err(err) => error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /checkout/payment
/// Validates the payment form and advances Payment → Review.
async fn submit_payment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitPaymentInput>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);

    let guard = match begin_guarded_submit(&state, &session_id) {
        Ok(guard) => guard,
        Err(err) => return error_response(err, &session_id, is_new),
    };

    tokio::time::sleep(state.config.submit_latency).await;
    drop(guard);

    let mut session = state.sessions.entry(session_id.clone()).or_default();
    // The cart may have been cleared during the latency window.
    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        drop(session);
        return error_response(CheckoutError::EmptyCart, &session_id, is_new);
    }
    let result = session.checkout.submit_payment(payload.payment);
    let view = CheckoutView::of(&session.checkout);
    drop(session);

    match result {
        Ok(()) => ok_response(view, &session_id, is_new),
        Err(err) => error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /checkout/place_order
/// Advances Review → Confirmation, generating the order number and clearing
/// the cart as the confirmation side effect.
async fn place_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SessionBody>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);

    let guard = match begin_guarded_submit(&state, &session_id) {
        Ok(guard) => guard,
        Err(err) => return error_response(err, &session_id, is_new),
    };

    tokio::time::sleep(state.config.submit_latency).await;
    drop(guard);

    let mut session = state.sessions.entry(session_id.clone()).or_default();
    // The cart may have been cleared during the latency window.
    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        drop(session);
        return error_response(CheckoutError::EmptyCart, &session_id, is_new);
    }
    let result = session.checkout.place_order();
    if result.is_ok() {
        session.cart.clear();
    }
    let view = CheckoutView::of(&session.checkout);
    drop(session);

    match result {
        Ok(order_number) => {
            tracing::info!(%session_id, %order_number, "order placed");
            ok_response(view, &session_id, is_new)
        }
        Err(err) => error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /checkout/back
/// Moves one step backward without erasing entered data.
async fn go_back(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SessionBody>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    if session.cart.is_empty() && session.checkout.step() != CheckoutStep::Confirmation {
        drop(session);
        return error_response(CheckoutError::EmptyCart, &session_id, is_new);
    }

    let result = session.checkout.back();
    let view = CheckoutView::of(&session.checkout);
    drop(session);

    match result {
        Ok(()) => ok_response(view, &session_id, is_new),
        Err(err) => error_response(err, &session_id, is_new),
    }
}

/// Endpoint: POST /checkout/restart
/// Resets the wizard to the shipping step with all data cleared. Allowed
/// from any step; this is the "continue shopping" action on confirmation.
async fn restart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SessionBody>,
) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers, payload.session_id);
    let mut session = state.sessions.entry(session_id.clone()).or_default();

    session.checkout.restart();
    let view = CheckoutView::of(&session.checkout);
    drop(session);

    ok_response(view, &session_id, is_new)
}
