use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::consultation::{Consultation, Severity},
    pagination::{PageParams, Paginated, Pagination},
    repositories::consultation::{self as consultation_repo, ConsultationFilter},
    state::AppState,
    validation::{auth::not_blank, json::ValidJson, path::IdPath},
};

/// A new consultation starts as not completed.
///
/// Unknown severities fail to deserialize and are reported as 400.
#[derive(Deserialize, Validate)]
pub struct CreateConsultationRequest {
    #[garde(range(min = 1))]
    pub patient_id: i64,
    #[garde(custom(not_blank))]
    pub reason: String,
    #[serde(default)]
    #[garde(skip)]
    pub diagnosis: String,
    #[serde(default)]
    #[garde(skip)]
    pub treatment: String,
    #[garde(skip)]
    pub severity: Severity,
}

#[derive(Deserialize, Validate)]
pub struct UpdateConsultationRequest {
    #[serde(default)]
    #[garde(range(min = 1))]
    pub patient_id: Option<i64>,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub reason: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub treatment: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub severity: Option<Severity>,
    #[serde(default)]
    #[garde(skip)]
    pub is_completed: Option<bool>,
}

impl UpdateConsultationRequest {
    fn apply(self, consultation: &mut Consultation) -> Result<()> {
        if let Some(patient_id) = self.patient_id {
            consultation.patient_id = patient_id;
        }
        if let Some(reason) = self.reason {
            let reason = reason.trim();
            if reason.is_empty() {
                return Err(AppError::Validation("reason: must not be blank".to_string()));
            }
            consultation.reason = reason.to_string();
        }
        if let Some(diagnosis) = self.diagnosis {
            consultation.diagnosis = diagnosis;
        }
        if let Some(treatment) = self.treatment {
            consultation.treatment = treatment;
        }
        if let Some(severity) = self.severity {
            consultation.severity = severity;
        }
        if let Some(is_completed) = self.is_completed {
            consultation.is_completed = is_completed;
        }
        Ok(())
    }
}

/// Query string of the global listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListConsultationsQuery {
    pub is_completed: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListConsultationsQuery {
    fn filter(&self) -> Result<ConsultationFilter> {
        match self.is_completed.as_deref().map(str::trim) {
            None | Some("") => Ok(ConsultationFilter::All),
            Some("true") => Ok(ConsultationFilter::Completed(true)),
            Some("false") => Ok(ConsultationFilter::Completed(false)),
            Some(other) => Err(AppError::Validation(format!(
                "is_completed: expected true or false, got {other:?}"
            ))),
        }
    }

    fn page_params(self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

async fn fetch_page(
    state: &AppState,
    filter: ConsultationFilter,
    params: &PageParams,
) -> Result<Paginated<Consultation>> {
    let pagination = Pagination::from_params(params);

    let total = consultation_repo::count(&state.db, filter).await?;
    let data =
        consultation_repo::list(&state.db, filter, pagination.limit, pagination.offset()).await?;

    Ok(Paginated::new(data, pagination, total))
}

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateConsultationRequest>,
) -> Result<Response> {
    let consultation = consultation_repo::create(
        &state.db,
        payload.patient_id,
        payload.reason.trim(),
        &payload.diagnosis,
        &payload.treatment,
        payload.severity,
    )
    .await?;

    tracing::info!(
        "✅ Consultation {} opened for patient {}",
        consultation.id,
        consultation.patient_id
    );
    Ok((StatusCode::CREATED, Json(consultation)).into_response())
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(state): State<AppState>,
    IdPath(consultation_id): IdPath,
) -> Result<Json<Consultation>> {
    Ok(Json(
        consultation_repo::find_by_id(&state.db, consultation_id).await?,
    ))
}

/// Lists every consultation, optionally only (un)completed ones.
#[axum::debug_handler]
pub async fn list_consultations(
    State(state): State<AppState>,
    Query(query): Query<ListConsultationsQuery>,
) -> Result<Json<Paginated<Consultation>>> {
    let filter = query.filter()?;
    let params = query.page_params();
    Ok(Json(fetch_page(&state, filter, &params).await?))
}

/// Consultations of every patient owned by one client.
#[axum::debug_handler]
pub async fn list_client_consultations(
    State(state): State<AppState>,
    IdPath(client_id): IdPath,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Consultation>>> {
    Ok(Json(
        fetch_page(&state, ConsultationFilter::Client(client_id), &params).await?,
    ))
}

#[axum::debug_handler]
pub async fn list_patient_consultations(
    State(state): State<AppState>,
    IdPath(patient_id): IdPath,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Consultation>>> {
    Ok(Json(
        fetch_page(&state, ConsultationFilter::Patient(patient_id), &params).await?,
    ))
}

/// Partial update; `updated_at` is bumped by the database.
#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<AppState>,
    IdPath(consultation_id): IdPath,
    ValidJson(payload): ValidJson<UpdateConsultationRequest>,
) -> Result<StatusCode> {
    let mut consultation = consultation_repo::find_by_id(&state.db, consultation_id).await?;
    payload.apply(&mut consultation)?;
    consultation_repo::update(&state.db, &consultation).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn delete_consultation(
    State(state): State<AppState>,
    IdPath(consultation_id): IdPath,
) -> Result<StatusCode> {
    consultation_repo::delete(&state.db, consultation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(is_completed: Option<&str>) -> ListConsultationsQuery {
        ListConsultationsQuery {
            is_completed: is_completed.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn completion_filter_parses_booleans() {
        assert_eq!(query(None).filter().unwrap(), ConsultationFilter::All);
        assert_eq!(
            query(Some("true")).filter().unwrap(),
            ConsultationFilter::Completed(true)
        );
        assert_eq!(
            query(Some("false")).filter().unwrap(),
            ConsultationFilter::Completed(false)
        );
        assert!(matches!(
            query(Some("yes")).filter(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let parsed = sonic_rs::from_str::<CreateConsultationRequest>(
            r#"{"patient_id":1,"reason":"Limp","severity":"URGENT"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_reason_fails_rules() {
        let request: CreateConsultationRequest = sonic_rs::from_str(
            r#"{"patient_id":1,"reason":"  ","severity":"LOW"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
