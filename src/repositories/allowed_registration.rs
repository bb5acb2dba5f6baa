use deadpool_postgres::{Pool, Transaction};
use crate::{
    error::{AppError, Result},
    models::allowed_registration::AllowedRegistration,
};

/// Adds a national ID to the registration allow-list.
pub async fn insert(pool: &Pool, dni: &str) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("INSERT INTO allowed_registrations (dni) VALUES ($1)", &[&dni])
        .await
        .map_err(|e| AppError::from_constraint(e, "DNI already allowed", "Invalid DNI"))?;
    Ok(())
}

/// Marks an allow-list entry as used.
///
/// One conditional UPDATE: of two concurrent callers, the second waits on the
/// row lock and then matches nothing. Unknown and used entries fail the same way.
pub async fn consume(tx: &Transaction<'_>, dni: &str) -> Result<()> {
    let consumed = tx
        .execute(
            "UPDATE allowed_registrations SET used = TRUE WHERE dni = $1 AND used = FALSE",
            &[&dni],
        )
        .await?;

    if consumed == 0 {
        return Err(AppError::InvalidRegistration);
    }
    Ok(())
}

/// Looks up an allow-list entry.
pub async fn find(pool: &Pool, dni: &str) -> Result<Option<AllowedRegistration>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT dni, used, created_at FROM allowed_registrations WHERE dni = $1",
            &[&dni],
        )
        .await?;
    row.map(|r| AllowedRegistration::try_from(&r).map_err(AppError::from))
        .transpose()
}

/// Removes an allow-list entry.
pub async fn delete(pool: &Pool, dni: &str) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM allowed_registrations WHERE dni = $1", &[&dni])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("DNI not found"));
    }
    Ok(())
}
