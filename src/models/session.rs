use chrono::{DateTime, Duration, Utc};
use tokio_postgres::Row;

use crate::crypto::token::generate_session_token;

/// Represents a user session.
///
/// A session has a fixed absolute lifetime; it is never extended.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque, URL-safe token; also the value of the `session_id` cookie.
    pub id: String,
    /// The ID of the user this session belongs to.
    pub user_id: i64,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session for `user_id`, valid for `ttl` from now.
    pub fn issue(user_id: i64, ttl: Duration) -> Self {
        Self::issue_at(user_id, ttl, Utc::now())
    }

    /// Creates a fresh session as if issued at `now`.
    pub fn issue_at(user_id: i64, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_session_token(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }
}

impl TryFrom<&Row> for Session {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_creation_plus_ttl() {
        let now = Utc::now();
        let session = Session::issue_at(7, Duration::hours(2), now);
        assert_eq!(session.user_id, 7);
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + Duration::hours(2));
    }

    #[test]
    fn each_session_gets_its_own_token() {
        let a = Session::issue(1, Duration::hours(1));
        let b = Session::issue(1, Duration::hours(1));
        assert_ne!(a.id, b.id);
    }
}
