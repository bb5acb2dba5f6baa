use deadpool_postgres::Pool;
use crate::{
    error::{AppError, Result},
    models::client::Client,
};

/// Creates a new client.
pub async fn create(pool: &Pool, dni: &str, name: &str, phone_number: &str) -> Result<Client> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO clients (dni, name, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id, dni, name, phone_number
            "#,
            &[&dni, &name, &phone_number],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Client DNI already registered", "Invalid client data"))?;
    Ok(Client::try_from(&row)?)
}

/// Finds a client by ID.
pub async fn find_by_id(pool: &Pool, client_id: i64) -> Result<Client> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT id, dni, name, phone_number FROM clients WHERE id = $1",
            &[&client_id],
        )
        .await?
        .ok_or(AppError::NotFound("Client not found"))?;
    Ok(Client::try_from(&row)?)
}

/// Finds a client by national ID.
pub async fn find_by_dni(pool: &Pool, dni: &str) -> Result<Client> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            "SELECT id, dni, name, phone_number FROM clients WHERE dni = $1",
            &[&dni],
        )
        .await?
        .ok_or(AppError::NotFound("Client not found"))?;
    Ok(Client::try_from(&row)?)
}

/// Replaces every field of a client.
pub async fn update(
    pool: &Pool,
    client_id: i64,
    dni: &str,
    name: &str,
    phone_number: &str,
) -> Result<()> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            "UPDATE clients SET dni = $1, name = $2, phone_number = $3 WHERE id = $4",
            &[&dni, &name, &phone_number, &client_id],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Client DNI already registered", "Invalid client data"))?;

    if updated == 0 {
        return Err(AppError::NotFound("Client not found"));
    }
    Ok(())
}

/// Deletes a client together with its patients and their consultations.
pub async fn delete(pool: &Pool, client_id: i64) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM clients WHERE id = $1", &[&client_id])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Client not found"));
    }
    Ok(())
}
