//! Session State Management
//!
//! This module manages per-session application state: each browser session
//! owns one cart and one checkout wizard, keyed by a session id carried in
//! the `cart_session` cookie (or passed explicitly by the client).

use crate::cart::store::Cart;
use crate::checkout::wizard::CheckoutState;
use crate::config::Config;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// State owned by a single shopping session: one cart, one checkout wizard.
#[derive(Debug, Default)]
pub struct Session {
    pub cart: Cart,
    pub checkout: CheckoutState,
}

/// Core application state containing all live sessions.
pub struct AppState {
    /// In-memory storage for sessions, keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    pub sessions: DashMap<String, Session>,

    /// Runtime configuration (bind address, simulated submit latency).
    pub config: Config,
}

impl AppState {
    /// Creates a new AppState with no sessions.
    pub fn new(config: Config) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }
}

/// Resolves the session id for a request.
///
/// Priority: an explicit id supplied by the client, then the
/// `cart_session` cookie, then a freshly generated id. The returned flag is
/// `true` when a new id was generated and a cookie should be set.
pub fn resolve_session_id(headers: &HeaderMap, explicit: Option<String>) -> (String, bool) {
    if let Some(id) = explicit.filter(|id| !id.is_empty()) {
        return (id, false);
    }

    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for part in cookies.split(';') {
            if let Some(id) = part.trim().strip_prefix("cart_session=") {
                if !id.is_empty() {
                    return (id.to_string(), false);
                }
            }
        }
    }

    (Uuid::new_v4().simple().to_string(), true)
}

/// Attaches a `Set-Cookie` header for newly created sessions.
pub fn with_session_cookie(mut response: Response, session_id: &str, is_new: bool) -> Response {
    if is_new {
        let cookie_val = format!("cart_session={}; Path=/; HttpOnly", session_id);
        if let Ok(value) = cookie_val.parse() {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_id_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "cart_session=cookie-id".parse().unwrap());

        let (id, is_new) = resolve_session_id(&headers, Some("explicit-id".into()));
        assert_eq!(id, "explicit-id");
        assert!(!is_new);
    }

    #[test]
    fn cookie_id_is_used_when_no_explicit_id() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; cart_session=cookie-id".parse().unwrap(),
        );

        let (id, is_new) = resolve_session_id(&headers, None);
        assert_eq!(id, "cookie-id");
        assert!(!is_new);
    }

    #[test]
    fn missing_id_generates_a_fresh_session() {
        let (id, is_new) = resolve_session_id(&HeaderMap::new(), None);
        assert!(!id.is_empty());
        assert!(is_new);
    }
}
