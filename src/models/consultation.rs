use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// How urgent a consultation is. Stored as the `severity` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "UPPERCASE")]
#[postgres(name = "severity")]
pub enum Severity {
    #[postgres(name = "LOW")]
    Low,
    #[postgres(name = "MEDIUM")]
    Medium,
    #[postgres(name = "HIGH")]
    High,
    #[postgres(name = "CRITICAL")]
    Critical,
}

/// A visit of a patient to the clinic.
#[derive(Debug, Clone, Serialize)]
pub struct Consultation {
    pub id: i64,
    pub patient_id: i64,
    pub reason: String,
    pub diagnosis: String,
    pub treatment: String,
    pub severity: Severity,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Consultation {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_id: row.try_get("patient_id")?,
            reason: row.try_get("reason")?,
            diagnosis: row.try_get("diagnosis")?,
            treatment: row.try_get("treatment")?,
            severity: row.try_get("severity")?,
            is_completed: row.try_get("is_completed")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
