use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::{Duration, OffsetDateTime};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::{
    config::Config,
    error::{AppError, Result},
    middleware_layer::auth::{extract_session_token, SESSION_COOKIE},
    models::session::Session,
    services::auth as auth_service,
    state::AppState,
    validation::{auth::not_blank, json::ValidJson},
};

/// The request payload for user login.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(custom(not_blank))]
    pub dni: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Builds the session cookie for `session`.
///
/// HttpOnly and `SameSite=Strict` always; `Secure` only in production.
/// Expiry mirrors the session's own expiry.
pub fn session_cookie(session: &Session, config: &Config) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session.id.clone());

    cookie.set_http_only(true);
    cookie.set_secure(config.is_production());
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_expires(to_offset_date_time(session.expires_at));

    let remaining = (session.expires_at - Utc::now()).num_seconds().max(0);
    cookie.set_max_age(Duration::seconds(remaining));

    cookie
}

/// A cookie that makes the browser drop the session cookie.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(0));
    cookie
}

fn to_offset_date_time(at: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(at.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Response> {
    tracing::debug!("🔐 Login attempt for DNI {}", payload.dni);

    let user = auth_service::authenticate_user(&state, payload.dni.trim(), payload.password).await?;
    let session = auth_service::start_session(&state, user.id).await?;

    cookies.add(session_cookie(&session, &state.config));
    tracing::info!("✅ User logged in: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user logout.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", session.user_id);

    let token = extract_session_token(&cookies)
        .ok_or_else(|| AppError::Authentication("Unauthorized".to_string()))?;

    auth_service::end_session(&state, &token).await?;
    cookies.remove(expired_session_cookie());

    tracing::info!("✅ User logged out: {}", session.user_id);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
