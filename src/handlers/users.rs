use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use garde::Validate;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    handlers::auth::expired_session_cookie,
    middleware_layer::auth::authorize_owner,
    models::{session::Session, user::UserResponse},
    repositories::user as user_repo,
    services::auth::{self as auth_service, NewUser},
    state::AppState,
    validation::{
        auth::{not_blank, not_blank_if_present},
        json::{parse_valid, ValidJson},
        path::IdPath,
    },
};

/// The request payload for self-registration.
///
/// The password is checked later, after the allow-list entry was consumed.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(custom(not_blank), length(max = 32))]
    pub dni: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub password: String,
    #[garde(custom(not_blank), length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[garde(length(max = 2048))]
    pub profile_picture: Option<String>,
}

/// The request payload for a profile update. Absent fields are kept.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[garde(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(custom(not_blank_if_present), length(max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[garde(length(max = 2048))]
    pub profile_picture: Option<String>,
}

/// The request payload for a password change.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[garde(length(min = 1))]
    pub current_password: String,
    #[garde(skip)]
    pub new_password: String,
}

/// Handles self-registration gated by the allow-list.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> Result<Response> {
    tracing::debug!("📝 Register attempt for DNI {}", payload.dni);

    let user = auth_service::register_user(
        &state,
        NewUser {
            dni: payload.dni.trim().to_string(),
            email: payload.email.trim().to_string(),
            password: payload.password,
            name: payload.name.trim().to_string(),
            profile_picture: payload.profile_picture.filter(|p| !p.trim().is_empty()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

/// Returns the user behind the current session.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<UserResponse>> {
    let user = user_repo::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Updates the caller's own profile.
///
/// The body is only parsed once ownership is established, so another
/// account's id is always 403.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    IdPath(user_id): IdPath,
    body: Bytes,
) -> Result<StatusCode> {
    authorize_owner(&session, user_id)?;
    let payload: UpdateUserRequest = parse_valid(&body)?;

    user_repo::update_profile(
        &state.db,
        user_id,
        payload.email.as_deref().map(str::trim),
        payload.name.as_deref().map(str::trim),
        payload.profile_picture.as_deref(),
    )
    .await?;

    tracing::info!("✅ Profile updated for user {}", user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the caller's own account; its sessions cascade.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    cookies: Cookies,
    IdPath(user_id): IdPath,
) -> Result<StatusCode> {
    authorize_owner(&session, user_id)?;

    user_repo::delete(&state.db, user_id).await?;
    cookies.remove(expired_session_cookie());

    tracing::info!("🗑️ User {} deleted", user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Changes the caller's own password and logs every session out.
#[axum::debug_handler]
pub async fn update_password(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    cookies: Cookies,
    IdPath(user_id): IdPath,
    body: Bytes,
) -> Result<StatusCode> {
    authorize_owner(&session, user_id)?;
    let payload: UpdatePasswordRequest = parse_valid(&body)?;

    auth_service::change_password(
        &state,
        user_id,
        payload.current_password,
        payload.new_password,
    )
    .await?;

    cookies.remove(expired_session_cookie());
    Ok(StatusCode::NO_CONTENT)
}
