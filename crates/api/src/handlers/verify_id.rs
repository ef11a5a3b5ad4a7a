//! Handler for the live duplicate-identifier check.
//!
//! Public and read-only: the client form fires it (debounced) while the user
//! types. "No matching row" is a normal `exists: false` answer; only genuine
//! store failures become 500s.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use padron_db::repositories::PersonaRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

/// Request body for `POST /api/verify-id`.
#[derive(Debug, Deserialize)]
pub struct VerifyIdRequest {
    #[serde(rename = "numeroId")]
    pub numero_id: Option<String>,
}

/// Response body: whether a persona with that identifier already exists.
#[derive(Debug, Serialize)]
pub struct VerifyIdResponse {
    pub exists: bool,
}

/// POST /api/verify-id
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyIdRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return mensaje(StatusCode::BAD_REQUEST, "Cuerpo JSON inválido");
    };

    let Some(numero_id) = request
        .numero_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return mensaje(StatusCode::BAD_REQUEST, "numeroId es requerido");
    };

    match PersonaRepo::exists_by_numero_id(&state.pool, numero_id).await {
        Ok(exists) => (StatusCode::OK, Json(VerifyIdResponse { exists })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, numero_id, "Identifier verification failed");
            mensaje(StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
        }
    }
}

fn mensaje(status: StatusCode, texto: &str) -> Response {
    (status, Json(json!({ "message": texto }))).into_response()
}
