use crate::crypto::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{AppError, Result};
use crate::models::{session::Session, user::User};
use crate::repositories::{
    allowed_registration as allowed_registration_repo, session as session_repo,
    user as user_repo,
};
use crate::state::AppState;
use crate::validation::auth::validate_password;

/// Message shared by every failed login, whatever the reason.
const INVALID_CREDENTIALS: &str = "Invalid DNI or password";

/// Input of a self-registration, already field-validated.
pub struct NewUser {
    pub dni: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

/// Registers a user through the allow-list gate.
///
/// Order: consume the allow-list entry, check the password policy, hash,
/// insert. All of it runs in one transaction; any failure after the entry
/// was consumed rolls the consumption back.
pub async fn register_user(state: &AppState, new_user: NewUser) -> Result<User> {
    tracing::debug!("📝 Registering user with DNI {}", new_user.dni);

    let mut client = state.db.get().await?;
    let tx = client.transaction().await?;

    allowed_registration_repo::consume(&tx, &new_user.dni).await?;
    validate_password(&new_user.password)?;

    let password_hash = hash_password_blocking(new_user.password).await?;

    let user = user_repo::insert(
        &tx,
        &new_user.dni,
        &new_user.email,
        &password_hash,
        &new_user.name,
        new_user.profile_picture.as_deref(),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by national ID and password.
pub async fn authenticate_user(state: &AppState, dni: &str, password: String) -> Result<User> {
    let user = user_repo::find_by_dni(&state.db, dni)
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password_blocking(user.password.clone(), password).await {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}

/// Issues and stores a new session for `user_id`.
pub async fn start_session(state: &AppState, user_id: i64) -> Result<Session> {
    let session = Session::issue(user_id, state.config.session_ttl);
    session_repo::insert(&state.db, &session).await?;

    tracing::info!("✅ Session issued for user {} until {}", user_id, session.expires_at);
    Ok(session)
}

/// Revokes the session behind `token`.
pub async fn end_session(state: &AppState, token: &str) -> Result<()> {
    match session_repo::delete(&state.db, token).await {
        Ok(()) => Ok(()),
        Err(AppError::NotFound(_)) => Err(AppError::Authentication("Unauthorized".to_string())),
        Err(e) => Err(e),
    }
}

/// Changes a user's password and terminates all of their sessions.
pub async fn change_password(
    state: &AppState,
    user_id: i64,
    current_password: String,
    new_password: String,
) -> Result<()> {
    tracing::info!("🔑 Changing password for user: {}", user_id);

    validate_password(&new_password)?;

    let user = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    if !verify_password_blocking(user.password, current_password).await {
        return Err(AppError::Authentication(
            "Invalid current password".to_string(),
        ));
    }

    let new_hash = hash_password_blocking(new_password).await?;

    let mut client = state.db.get().await?;
    let tx = client.transaction().await?;
    user_repo::update_password(&tx, user_id, &new_hash).await?;
    let revoked = session_repo::delete_for_user(&tx, user_id).await?;
    tx.commit().await?;

    tracing::info!("✅ Password changed for user {}; {} session(s) revoked", user_id, revoked);
    Ok(())
}

/// Deletes expired sessions; used by the background sweeper.
pub async fn sweep_expired_sessions(state: &AppState) -> Result<u64> {
    let removed = session_repo::delete_expired(&state.db).await?;
    if removed > 0 {
        tracing::info!("🧹 Removed {} expired session(s)", removed);
    } else {
        tracing::debug!("🧹 No expired sessions");
    }
    Ok(removed)
}
