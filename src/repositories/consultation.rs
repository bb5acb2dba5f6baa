use deadpool_postgres::Pool;
use crate::{
    error::{AppError, Result},
    models::consultation::{Consultation, Severity},
};

/// Which consultations a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationFilter {
    All,
    Completed(bool),
    Patient(i64),
    /// Every consultation of every patient owned by the client.
    Client(i64),
}

/// Creates a new, not yet completed consultation.
pub async fn create(
    pool: &Pool,
    patient_id: i64,
    reason: &str,
    diagnosis: &str,
    treatment: &str,
    severity: Severity,
) -> Result<Consultation> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO consultations (patient_id, reason, diagnosis, treatment, severity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, patient_id, reason, diagnosis, treatment, severity,
                      is_completed, created_at, updated_at
            "#,
            &[&patient_id, &reason, &diagnosis, &treatment, &severity],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Consultation already exists", "Patient not found"))?;
    Ok(Consultation::try_from(&row)?)
}

/// Finds a consultation by ID.
pub async fn find_by_id(pool: &Pool, consultation_id: i64) -> Result<Consultation> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, patient_id, reason, diagnosis, treatment, severity,
                   is_completed, created_at, updated_at
            FROM consultations
            WHERE id = $1
            "#,
            &[&consultation_id],
        )
        .await?
        .ok_or(AppError::NotFound("Consultation not found"))?;
    Ok(Consultation::try_from(&row)?)
}

/// Lists one page of consultations, newest first.
pub async fn list(
    pool: &Pool,
    filter: ConsultationFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Consultation>> {
    let client = pool.get().await?;
    let rows = match filter {
        ConsultationFilter::All => {
            client
                .query(
                    r#"
                    SELECT id, patient_id, reason, diagnosis, treatment, severity,
                           is_completed, created_at, updated_at
                    FROM consultations
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1 OFFSET $2
                    "#,
                    &[&limit, &offset],
                )
                .await?
        }
        ConsultationFilter::Completed(is_completed) => {
            client
                .query(
                    r#"
                    SELECT id, patient_id, reason, diagnosis, treatment, severity,
                           is_completed, created_at, updated_at
                    FROM consultations
                    WHERE is_completed = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                    &[&is_completed, &limit, &offset],
                )
                .await?
        }
        ConsultationFilter::Patient(patient_id) => {
            client
                .query(
                    r#"
                    SELECT id, patient_id, reason, diagnosis, treatment, severity,
                           is_completed, created_at, updated_at
                    FROM consultations
                    WHERE patient_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                    &[&patient_id, &limit, &offset],
                )
                .await?
        }
        ConsultationFilter::Client(client_id) => {
            client
                .query(
                    r#"
                    SELECT c.id, c.patient_id, c.reason, c.diagnosis, c.treatment, c.severity,
                           c.is_completed, c.created_at, c.updated_at
                    FROM consultations c
                    JOIN patients p ON c.patient_id = p.id
                    WHERE p.owner_id = $1
                    ORDER BY c.created_at DESC, c.id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                    &[&client_id, &limit, &offset],
                )
                .await?
        }
    };

    rows.iter()
        .map(|r| Consultation::try_from(r).map_err(AppError::from))
        .collect()
}

/// Counts the consultations a listing covers.
pub async fn count(pool: &Pool, filter: ConsultationFilter) -> Result<i64> {
    let client = pool.get().await?;
    let row = match filter {
        ConsultationFilter::All => {
            client
                .query_one("SELECT COUNT(*) FROM consultations", &[])
                .await?
        }
        ConsultationFilter::Completed(is_completed) => {
            client
                .query_one(
                    "SELECT COUNT(*) FROM consultations WHERE is_completed = $1",
                    &[&is_completed],
                )
                .await?
        }
        ConsultationFilter::Patient(patient_id) => {
            client
                .query_one(
                    "SELECT COUNT(*) FROM consultations WHERE patient_id = $1",
                    &[&patient_id],
                )
                .await?
        }
        ConsultationFilter::Client(client_id) => {
            client
                .query_one(
                    r#"
                    SELECT COUNT(*)
                    FROM consultations c
                    JOIN patients p ON c.patient_id = p.id
                    WHERE p.owner_id = $1
                    "#,
                    &[&client_id],
                )
                .await?
        }
    };
    Ok(row.try_get(0)?)
}

/// Writes back every field of a consultation and bumps `updated_at`.
pub async fn update(pool: &Pool, consultation: &Consultation) -> Result<()> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            r#"
            UPDATE consultations
            SET patient_id = $1, reason = $2, diagnosis = $3, treatment = $4,
                severity = $5, is_completed = $6, updated_at = NOW()
            WHERE id = $7
            "#,
            &[
                &consultation.patient_id,
                &consultation.reason,
                &consultation.diagnosis,
                &consultation.treatment,
                &consultation.severity,
                &consultation.is_completed,
                &consultation.id,
            ],
        )
        .await
        .map_err(|e| AppError::from_constraint(e, "Consultation already exists", "Patient not found"))?;

    if updated == 0 {
        return Err(AppError::NotFound("Consultation not found"));
    }
    Ok(())
}

/// Deletes a consultation.
pub async fn delete(pool: &Pool, consultation_id: i64) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM consultations WHERE id = $1", &[&consultation_id])
        .await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Consultation not found"));
    }
    Ok(())
}
