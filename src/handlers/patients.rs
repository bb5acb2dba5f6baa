use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::patient::Patient,
    repositories::patient as patient_repo,
    state::AppState,
    validation::{auth::not_blank, json::ValidJson, path::IdPath},
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[garde(custom(not_blank), length(max = 255))]
    pub name: String,
    #[garde(custom(not_blank), length(max = 255))]
    pub species: String,
    #[garde(custom(not_blank), length(max = 255))]
    pub breed: String,
    #[garde(skip)]
    pub aprox_date_of_birth: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub owner_id: i64,
}

/// Partial update. Only the fields present are written.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    #[serde(default)]
    #[garde(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[garde(length(min = 1, max = 255))]
    pub species: Option<String>,
    #[serde(default)]
    #[garde(length(min = 1, max = 255))]
    pub breed: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub aprox_date_of_birth: Option<DateTime<Utc>>,
    #[serde(default)]
    #[garde(range(min = 1))]
    pub owner_id: Option<i64>,
}

impl UpdatePatientRequest {
    fn apply(self, patient: &mut Patient) -> Result<()> {
        if let Some(name) = self.name {
            patient.name = non_blank("name", name)?;
        }
        if let Some(species) = self.species {
            patient.species = non_blank("species", species)?;
        }
        if let Some(breed) = self.breed {
            patient.breed = non_blank("breed", breed)?;
        }
        if let Some(date) = self.aprox_date_of_birth {
            patient.aprox_date_of_birth = date;
        }
        if let Some(owner_id) = self.owner_id {
            patient.owner_id = owner_id;
        }
        Ok(())
    }
}

fn non_blank(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field}: must not be blank")));
    }
    Ok(trimmed.to_string())
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreatePatientRequest>,
) -> Result<Response> {
    let patient = patient_repo::create(
        &state.db,
        payload.name.trim(),
        payload.species.trim(),
        payload.breed.trim(),
        payload.aprox_date_of_birth,
        payload.owner_id,
    )
    .await?;

    tracing::info!("✅ Patient {} created for owner {}", patient.id, patient.owner_id);
    Ok((StatusCode::CREATED, Json(patient)).into_response())
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath,
) -> Result<Json<Patient>> {
    Ok(Json(patient_repo::find_by_id(&state.db, patient_id).await?))
}

/// All patients of one owner. An owner without patients yields `[]`.
#[axum::debug_handler]
pub async fn list_patients_by_owner(
    State(state): State<AppState>,
    IdPath(owner_id): IdPath,
) -> Result<Json<Vec<Patient>>> {
    Ok(Json(patient_repo::list_by_owner(&state.db, owner_id).await?))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath,
    ValidJson(payload): ValidJson<UpdatePatientRequest>,
) -> Result<StatusCode> {
    let mut patient = patient_repo::find_by_id(&state.db, patient_id).await?;
    payload.apply(&mut patient)?;
    patient_repo::update(&state.db, &patient).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a patient and its consultations.
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath,
) -> Result<StatusCode> {
    patient_repo::delete(&state.db, patient_id).await?;

    tracing::info!("🗑️ Patient {} deleted", patient_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn patient() -> Patient {
        Patient {
            id: 1,
            name: "Luna".to_string(),
            species: "Dog".to_string(),
            breed: "Beagle".to_string(),
            aprox_date_of_birth: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            owner_id: 7,
        }
    }

    fn update(json: &str) -> UpdatePatientRequest {
        sonic_rs::from_str(json).unwrap()
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let mut p = patient();
        update(r#"{"name":" Nala ","ownerId":9}"#).apply(&mut p).unwrap();

        assert_eq!(p.name, "Nala");
        assert_eq!(p.owner_id, 9);
        assert_eq!(p.species, "Dog");
        assert_eq!(p.breed, "Beagle");
    }

    #[test]
    fn blank_string_is_rejected() {
        let mut p = patient();
        let err = update(r#"{"breed":"   "}"#).apply(&mut p).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn non_positive_owner_fails_rules() {
        assert!(update(r#"{"ownerId":0}"#).validate().is_err());
        assert!(update(r#"{"name":""}"#).validate().is_err());
        assert!(update(r#"{}"#).validate().is_ok());
    }
}
