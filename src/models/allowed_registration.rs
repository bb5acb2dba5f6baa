use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// A national ID pre-authorized to self-register once.
#[derive(Debug, Clone)]
pub struct AllowedRegistration {
    pub dni: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for AllowedRegistration {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            dni: row.try_get("dni")?,
            used: row.try_get("used")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
