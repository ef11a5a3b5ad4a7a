pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST /login            login (public, form-encoded)
/// POST /logout           logout (requires session cookie)
/// POST /refresh          rotate the refresh token (public, cookie-driven)
///
/// GET  /personas         list personas (requires session cookie)
/// POST /personas         creation workflow (multipart; requires session cookie)
/// GET  /personas/{id}    persona detail (requires session cookie)
///
/// POST /verify-id        live duplicate-identifier check (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/refresh", post(handlers::auth::refresh))
        .route(
            "/personas",
            get(handlers::personas::list).post(handlers::personas::create),
        )
        .route("/personas/{id}", get(handlers::personas::get))
        .route("/verify-id", post(handlers::verify_id::verify))
}
