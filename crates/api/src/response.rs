//! Shared response helpers for API handlers.
//!
//! JSON endpoints use the `{ "data": ... }` envelope via [`DataResponse`].
//! Browser-facing flows (login, persona creation) communicate their outcome
//! through a redirect whose query string carries the message; the helpers
//! here do the URL encoding so handlers never build query strings by hand.

use axum::response::Redirect;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Redirect to `path` with a `success` message in the query string.
pub fn redirect_with_success(path: &str, message: &str) -> Redirect {
    redirect_with_param(path, "success", message)
}

/// Redirect to `path` with an `error` message in the query string.
pub fn redirect_with_error(path: &str, message: &str) -> Redirect {
    redirect_with_param(path, "error", message)
}

fn redirect_with_param(path: &str, param: &str, message: &str) -> Redirect {
    let query = serde_urlencoded::to_string([(param, message)])
        .unwrap_or_else(|_| format!("{param}="));
    Redirect::to(&format!("{path}?{query}"))
}
