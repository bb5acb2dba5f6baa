use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    repositories::session as session_repo,
    state::AppState,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Extracts the session token from the request cookies.
pub fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// A middleware that requires a valid session to be present.
///
/// On success the resolved [`Session`] is available to handlers as
/// `Extension<Session>`. The session is only read, never extended.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = extract_session_token(&cookies).ok_or_else(|| {
        tracing::debug!("No session cookie on {}", request.uri().path());
        AppError::Authentication("Unauthorized".to_string())
    })?;

    let session = match session_repo::find_active(&state.db, &token).await {
        Ok(session) => session,
        Err(AppError::NotFound(_)) => {
            return Err(AppError::Authentication("Unauthorized".to_string()));
        }
        Err(e) => return Err(e),
    };

    tracing::debug!("🔑 Session resolved for user {}", session.user_id);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Ownership guard for "my own account" operations.
///
/// A mismatch is `Forbidden` (403), not an authentication failure.
pub fn authorize_owner(session: &Session, path_user_id: i64) -> Result<()> {
    if session.user_id != path_user_id {
        tracing::warn!(
            "User {} tried to act on account {}",
            session.user_id,
            path_user_id
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn owner_passes_guard() {
        let session = Session::issue(42, Duration::hours(1));
        assert!(authorize_owner(&session, 42).is_ok());
    }

    #[test]
    fn other_account_is_forbidden() {
        let session = Session::issue(42, Duration::hours(1));
        assert!(matches!(authorize_owner(&session, 43), Err(AppError::Forbidden)));
    }
}
