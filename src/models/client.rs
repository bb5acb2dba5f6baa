use serde::Serialize;
use tokio_postgres::Row;

/// A pet owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub dni: String,
    pub name: String,
    pub phone_number: String,
}

impl TryFrom<&Row> for Client {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            dni: row.try_get("dni")?,
            name: row.try_get("name")?,
            phone_number: row.try_get("phone_number")?,
        })
    }
}
