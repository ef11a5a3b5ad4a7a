//! Handlers for the session gateway (login, refresh, logout).
//!
//! Sessions travel as two cookies: the `sb-access-token` JWT and an opaque
//! `sb-refresh-token`. Login and logout answer with redirects because they
//! are plain browser form posts; refresh is called from page scripts and
//! answers 204.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use padron_core::error::CoreError;
use padron_core::types::DbId;
use padron_db::models::session::CreateSession;
use padron_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::redirect_with_error;
use crate::state::AppState;

/// Credential-failure message. Deliberately the same for "no such user" and
/// "wrong password".
const MENSAJE_CREDENCIALES: &str = "Email o contraseña incorrectos.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login` (form-encoded).
///
/// Both fields are optional so that an incomplete form reaches the handler
/// and is answered with a redirect instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Freshly issued token pair for one session.
struct SessionTokens {
    access_token: String,
    refresh_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Authenticate with email + password. On success, sets both session cookies
/// and redirects to `/personas`; on failure, redirects to `/login` with the
/// error message in the query string.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Form(input): axum::Form<LoginForm>,
) -> (CookieJar, Redirect) {
    match sign_in(&state, input).await {
        Ok(tokens) => {
            let jar = add_session_cookies(jar, &state, tokens);
            (jar, Redirect::to("/personas"))
        }
        Err(err) => {
            tracing::warn!(error = %err, "Login rejected");
            (jar, redirect_with_error("/login", &err.user_message()))
        }
    }
}

/// POST /api/refresh
///
/// Exchange the `sb-refresh-token` cookie for a new token pair. The old
/// session is revoked (token rotation). Returns 204 with fresh cookies.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    let token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Falta el token de renovación.".into(),
            ))
        })?;

    let token_hash = hash_refresh_token(&token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "La sesión ha expirado o fue revocada.".into(),
            ))
        })?;

    // Rotation: the presented token is single-use.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("El usuario ya no existe.".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "La cuenta está desactivada.".into(),
        )));
    }

    let tokens = create_session_tokens(&state, user.id, &user.email).await?;
    let jar = add_session_cookies(jar, &state, tokens);

    Ok((jar, StatusCode::NO_CONTENT))
}

/// POST /api/logout
///
/// Revoke all sessions for the authenticated user, clear both cookies, and
/// send the browser back to the start page.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth_user: AuthUser,
) -> AppResult<(CookieJar, Redirect)> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");

    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE));

    Ok((jar, Redirect::to("/")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve credentials to a fresh token pair, persisting the session row.
async fn sign_in(state: &AppState, input: LoginForm) -> AppResult<SessionTokens> {
    let email = campo_presente(input.email)
        .ok_or_else(|| validation("Email y contraseña son requeridos."))?;
    let password = campo_presente(input.password)
        .ok_or_else(|| validation("Email y contraseña son requeridos."))?;

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(MENSAJE_CREDENCIALES.into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "La cuenta está desactivada.".into(),
        )));
    }

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            MENSAJE_CREDENCIALES.into(),
        )));
    }

    tracing::info!(user_id = user.id, email = %user.email, "User logged in");

    create_session_tokens(state, user.id, &user.email).await
}

/// Generate access + refresh tokens and persist the session row.
async fn create_session_tokens(
    state: &AppState,
    user_id: DbId,
    email: &str,
) -> AppResult<SessionTokens> {
    let access_token = generate_access_token(user_id, email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(SessionTokens {
        access_token,
        refresh_token: refresh_plaintext,
    })
}

/// Attach both session cookies to the jar, with lifetimes from configuration.
fn add_session_cookies(jar: CookieJar, state: &AppState, tokens: SessionTokens) -> CookieJar {
    let config = &state.config;
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token,
        config.jwt.access_token_expiry_mins * 60,
        config.cookie_secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token,
        config.jwt.refresh_token_expiry_days * 24 * 60 * 60,
        config.cookie_secure,
    ))
}

/// Build an HttpOnly session cookie scoped to the whole site.
fn session_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// A cookie that matches name and path so the jar emits a removal.
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

fn campo_presente(valor: Option<String>) -> Option<String> {
    valor
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn validation(msg: &str) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}
