use deadpool_postgres::{Pool, Transaction};
use tokio_postgres::error::SqlState;
use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// Persists a freshly issued session.
///
/// A token collision surfaces as an error; it is not retried.
pub async fn insert(pool: &Pool, session: &Session) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
            &[&session.id, &session.user_id, &session.created_at, &session.expires_at],
        )
        .await
        .map_err(|e| match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                AppError::Internal("Session token collision".to_string())
            }
            _ => AppError::Database(e),
        })?;
    Ok(())
}

/// Resolves a token to a session that has not expired yet.
///
/// Absent and expired sessions are both `NotFound`.
pub async fn find_active(pool: &Pool, token: &str) -> Result<Session> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            SELECT id, user_id, created_at, expires_at
            FROM sessions
            WHERE id = $1 AND expires_at > NOW()
            "#,
        )
        .await?;

    let row = client
        .query_opt(&statement, &[&token])
        .await?
        .ok_or(AppError::NotFound("Session not found"))?;

    Ok(Session::try_from(&row)?)
}

/// Deletes a session by token.
pub async fn delete(pool: &Pool, token: &str) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM sessions WHERE id = $1", &[&token])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Session not found"));
    }
    Ok(())
}

/// Deletes every session of a user.
pub async fn delete_for_user(tx: &Transaction<'_>, user_id: i64) -> Result<u64> {
    Ok(tx
        .execute("DELETE FROM sessions WHERE user_id = $1", &[&user_id])
        .await?)
}

/// Deletes all expired sessions. Returns how many rows went away.
pub async fn delete_expired(pool: &Pool) -> Result<u64> {
    let client = pool.get().await?;
    Ok(client
        .execute("DELETE FROM sessions WHERE expires_at <= NOW()", &[])
        .await?)
}
