use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

/// Represents a user in the system.
#[derive(Clone)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The user's national ID.
    pub dni: String,
    /// The user's email address.
    pub email: String,
    /// The user's hashed password.
    pub password: String,
    /// The user's display name.
    pub name: String,
    /// Reference to the user's profile picture.
    pub profile_picture: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("dni", &self.dni)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("profile_picture", &self.profile_picture)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl TryFrom<&Row> for User {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            dni: row.try_get("dni")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            name: row.try_get("name")?,
            profile_picture: row.try_get("profile_picture")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// The public view of a user; the password hash never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub dni: String,
    pub email: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            dni: user.dni,
            email: user.email,
            name: user.name,
            profile_picture: user.profile_picture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            dni: "12345678A".into(),
            email: "vet@example.com".into(),
            password: "$argon2id$secret".into(),
            name: "Ana".into(),
            profile_picture: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn response_never_carries_the_hash() {
        let json = sonic_rs::to_string(&UserResponse::from(user())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains(r#""profilePicture":null"#));
    }

    #[test]
    fn debug_output_redacts_the_hash() {
        let printed = format!("{:?}", user());
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("argon2"));
        assert!(printed.contains("12345678A"));
    }
}
