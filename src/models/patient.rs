use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

/// An animal treated at the clinic, owned by a [`Client`](super::client::Client).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub aprox_date_of_birth: DateTime<Utc>,
    pub owner_id: i64,
}

impl TryFrom<&Row> for Patient {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            species: row.try_get("species")?,
            breed: row.try_get("breed")?,
            aprox_date_of_birth: row.try_get("aprox_date_of_birth")?,
            owner_id: row.try_get("owner_id")?,
        })
    }
}
