use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use crate::{
    error::{AppError, Result},
    models::patient::Patient,
};

/// Creates a new patient for an existing owner.
pub async fn create(
    pool: &Pool,
    name: &str,
    species: &str,
    breed: &str,
    aprox_date_of_birth: DateTime<Utc>,
    owner_id: i64,
) -> Result<Patient> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO patients (name, species, breed, aprox_date_of_birth, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, species, breed, aprox_date_of_birth, owner_id
            "#,
            &[&name, &species, &breed, &aprox_date_of_birth, &owner_id],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Patient already exists", "Owner not found"))?;
    Ok(Patient::try_from(&row)?)
}

/// Finds a patient by ID.
pub async fn find_by_id(pool: &Pool, patient_id: i64) -> Result<Patient> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, name, species, breed, aprox_date_of_birth, owner_id
            FROM patients
            WHERE id = $1
            "#,
            &[&patient_id],
        )
        .await?
        .ok_or(AppError::NotFound("Patient not found"))?;
    Ok(Patient::try_from(&row)?)
}

/// Lists the patients of one owner.
pub async fn list_by_owner(pool: &Pool, owner_id: i64) -> Result<Vec<Patient>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, name, species, breed, aprox_date_of_birth, owner_id
            FROM patients
            WHERE owner_id = $1
            ORDER BY id
            "#,
            &[&owner_id],
        )
        .await?;
    rows.iter()
        .map(|r| Patient::try_from(r).map_err(AppError::from))
        .collect()
}

/// Writes back every field of a patient.
pub async fn update(pool: &Pool, patient: &Patient) -> Result<()> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            r#"
            UPDATE patients
            SET name = $1, species = $2, breed = $3, aprox_date_of_birth = $4, owner_id = $5
            WHERE id = $6
            "#,
            &[
                &patient.name,
                &patient.species,
                &patient.breed,
                &patient.aprox_date_of_birth,
                &patient.owner_id,
                &patient.id,
            ],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Patient already exists", "Owner not found"))?;

    if updated == 0 {
        return Err(AppError::NotFound("Patient not found"));
    }
    Ok(())
}

/// Deletes a patient and its consultations.
pub async fn delete(pool: &Pool, patient_id: i64) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM patients WHERE id = $1", &[&patient_id])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Patient not found"));
    }
    Ok(())
}
