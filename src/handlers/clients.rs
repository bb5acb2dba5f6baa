use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use garde::Validate;
use serde::Deserialize;

use crate::{
    error::Result,
    models::client::Client,
    repositories::client as client_repo,
    state::AppState,
    validation::{auth::not_blank, json::ValidJson, path::IdPath},
};

/// Payload for creating a client or replacing all of its fields.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[garde(custom(not_blank), length(max = 32))]
    pub dni: String,
    #[garde(custom(not_blank), length(max = 255))]
    pub name: String,
    #[garde(custom(not_blank), length(max = 32))]
    pub phone_number: String,
}

#[axum::debug_handler]
pub async fn create_client(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ClientRequest>,
) -> Result<Response> {
    let client = client_repo::create(
        &state.db,
        payload.dni.trim(),
        payload.name.trim(),
        payload.phone_number.trim(),
    )
    .await?;

    tracing::info!("✅ Client {} created", client.id);
    Ok((StatusCode::CREATED, Json(client)).into_response())
}

#[axum::debug_handler]
pub async fn get_client(
    State(state): State<AppState>,
    IdPath(client_id): IdPath,
) -> Result<Json<Client>> {
    Ok(Json(client_repo::find_by_id(&state.db, client_id).await?))
}

#[axum::debug_handler]
pub async fn get_client_by_dni(
    State(state): State<AppState>,
    Path(dni): Path<String>,
) -> Result<Json<Client>> {
    Ok(Json(client_repo::find_by_dni(&state.db, dni.trim()).await?))
}

/// Replaces every field of a client.
#[axum::debug_handler]
pub async fn update_client(
    State(state): State<AppState>,
    IdPath(client_id): IdPath,
    ValidJson(payload): ValidJson<ClientRequest>,
) -> Result<StatusCode> {
    client_repo::update(
        &state.db,
        client_id,
        payload.dni.trim(),
        payload.name.trim(),
        payload.phone_number.trim(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a client; its patients and their consultations go with it.
#[axum::debug_handler]
pub async fn delete_client(
    State(state): State<AppState>,
    IdPath(client_id): IdPath,
) -> Result<StatusCode> {
    client_repo::delete(&state.db, client_id).await?;

    tracing::info!("🗑️ Client {} deleted", client_id);
    Ok(StatusCode::NO_CONTENT)
}
