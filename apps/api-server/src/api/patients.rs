//! Patient API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use clinic_store::{ClinicStore, ClinicStoreError};
use entities::Patient;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::MessageResponse;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Patient creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: String,
    pub cpf: String,
    pub birth_date: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Patient partial-update request body. Only supplied, non-empty fields
/// overwrite stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn parse_id(id: &str) -> ServerResult<Uuid> {
    id.parse()
        .map_err(|_| ServerError::Validation("Invalid patient id".to_string()))
}

/// Applies an incoming field to a stored one, skipping absent or empty values.
fn merge_field(target: &mut String, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *target = value;
        }
    }
}

/// Like `merge_field`, for optional stored fields. An absent or empty
/// incoming value leaves the stored one untouched (it never clears).
fn merge_optional(target: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *target = Some(value);
        }
    }
}

/// Lists all patients, newest-created-first.
pub async fn list_patients<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Patient>>> {
    let patients = state.store.list_patients().await?;
    Ok(Json(patients))
}

/// Gets a patient by ID.
pub async fn get_patient<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Patient>> {
    let id = parse_id(&id)?;

    let patient = state
        .store
        .get_patient(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Patient not found".to_string()))?;

    Ok(Json(patient))
}

/// Creates a patient. The store's cpf uniqueness constraint is the
/// authoritative duplicate check.
pub async fn create_patient<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreatePatientRequest>,
) -> ServerResult<(StatusCode, Json<Patient>)> {
    if request.name.trim().is_empty()
        || request.cpf.trim().is_empty()
        || request.birth_date.trim().is_empty()
    {
        return Err(ServerError::Validation("Invalid patient data".to_string()));
    }

    let mut patient = Patient::new(request.name, request.cpf, request.birth_date);
    patient.phone = request.phone.filter(|p| !p.is_empty());
    patient.address = request.address.filter(|a| !a.is_empty());

    let created = match state.store.create_patient(patient).await {
        Ok(patient) => patient,
        Err(ClinicStoreError::UniqueViolation { .. }) => {
            return Err(ServerError::Conflict(
                "Patient with this CPF already exists".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(patient_id = %created.id, "Patient registered");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially updates a patient.
pub async fn update_patient<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> ServerResult<Json<Patient>> {
    let id = parse_id(&id)?;

    let mut patient = state
        .store
        .get_patient(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Patient not found".to_string()))?;

    merge_field(&mut patient.name, request.name);
    merge_field(&mut patient.cpf, request.cpf);
    merge_field(&mut patient.birth_date, request.birth_date);
    merge_optional(&mut patient.phone, request.phone);
    merge_optional(&mut patient.address, request.address);
    patient.updated_at = Utc::now();

    let updated = match state.store.update_patient(patient).await {
        Ok(patient) => patient,
        Err(ClinicStoreError::UniqueViolation { .. }) => {
            return Err(ServerError::Conflict(
                "Patient with this CPF already exists".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(patient_id = %updated.id, "Patient updated");

    Ok(Json(updated))
}

/// Deletes a patient. Dependent medical records are left in place and stay
/// readable.
pub async fn delete_patient<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    state
        .store
        .get_patient(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Patient not found".to_string()))?;

    state.store.delete_patient(id).await?;

    tracing::info!(patient_id = %id, "Patient removed");

    Ok(Json(MessageResponse::new("Patient removed")))
}
