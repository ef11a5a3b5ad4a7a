//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use padron_core::error::CoreError;
use padron_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::auth::ACCESS_TOKEN_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `sb-access-token` session cookie.
///
/// Use this as an extractor parameter in any JSON handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, email = %user.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// Rejections become 401 JSON responses. The persona creation flow reports
/// failures through a redirect instead, so it authenticates inside the
/// handler rather than through this extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's email (from `claims.email`), for attribution in logs.
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Falta la cookie de sesión.".into()))
            })?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Sesión inválida o expirada.".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
