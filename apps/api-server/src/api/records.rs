//! Medical record API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use clinic_store::ClinicStore;
use entities::MedicalRecord;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::MessageResponse;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Record creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub patient_id: String,
    pub description: String,
    pub observations: Option<String>,
    pub therapist_id: String,
}

/// Record partial-update request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    pub description: Option<String>,
    pub observations: Option<String>,
    pub therapist_id: Option<String>,
}

fn parse_uuid(value: &str, message: &str) -> ServerResult<Uuid> {
    value
        .parse()
        .map_err(|_| ServerError::Validation(message.to_string()))
}

fn merge_field(target: &mut String, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *target = value;
        }
    }
}

/// Lists all medical records, newest-first.
pub async fn list_records<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<MedicalRecord>>> {
    let records = state.store.list_records().await?;
    Ok(Json(records))
}

/// Lists a patient's records, newest-first. The patient itself is not looked
/// up: an unknown id yields an empty list, and records whose patient has
/// been deleted still appear.
pub async fn list_records_for_patient<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(patient_id): Path<String>,
) -> ServerResult<Json<Vec<MedicalRecord>>> {
    let patient_id = parse_uuid(&patient_id, "Invalid patient id")?;

    let records = state.store.list_records_for_patient(patient_id).await?;

    Ok(Json(records))
}

/// Gets a medical record by ID.
pub async fn get_record<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<MedicalRecord>> {
    let id = parse_uuid(&id, "Invalid record id")?;

    let record = state
        .store
        .get_record(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Record not found".to_string()))?;

    Ok(Json(record))
}

/// Creates a medical record. The therapist reference must resolve to an
/// existing user; their current name is snapshotted into the record.
pub async fn create_record<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreateRecordRequest>,
) -> ServerResult<(StatusCode, Json<MedicalRecord>)> {
    let patient_id = parse_uuid(&request.patient_id, "Invalid patient id")?;
    let therapist_id = parse_uuid(&request.therapist_id, "Invalid therapist id")?;

    if request.description.trim().is_empty() {
        return Err(ServerError::Validation("Invalid record data".to_string()));
    }

    let therapist = state
        .store
        .get_user(therapist_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Therapist not found".to_string()))?;

    let record = MedicalRecord::new(
        patient_id,
        request.description,
        request.observations.unwrap_or_default(),
        therapist_id,
        therapist.name,
    );

    let created = state.store.create_record(record).await?;

    tracing::info!(record_id = %created.id, patient_id = %patient_id, "Record created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially updates a medical record.
///
/// The therapist name snapshot refreshes only when `therapistId` is supplied
/// and differs from the stored value; re-sending the current id leaves the
/// snapshot alone even if the user has since been renamed.
pub async fn update_record<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRecordRequest>,
) -> ServerResult<Json<MedicalRecord>> {
    let id = parse_uuid(&id, "Invalid record id")?;

    let mut record = state
        .store
        .get_record(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Record not found".to_string()))?;

    merge_field(&mut record.description, request.description);
    merge_field(&mut record.observations, request.observations);

    if let Some(therapist_id) = request.therapist_id.filter(|t| !t.is_empty()) {
        let therapist_id = parse_uuid(&therapist_id, "Invalid therapist id")?;

        if therapist_id != record.therapist_id {
            let therapist = state
                .store
                .get_user(therapist_id)
                .await?
                .ok_or_else(|| ServerError::NotFound("Therapist not found".to_string()))?;

            record.therapist_id = therapist_id;
            record.therapist_name = therapist.name;
        }
    }

    record.updated_at = Utc::now();

    let updated = state.store.update_record(record).await?;

    tracing::info!(record_id = %updated.id, "Record updated");

    Ok(Json(updated))
}

/// Deletes a medical record.
pub async fn delete_record<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    let id = parse_uuid(&id, "Invalid record id")?;

    state
        .store
        .get_record(id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Record not found".to_string()))?;

    state.store.delete_record(id).await?;

    tracing::info!(record_id = %id, "Record removed");

    Ok(Json(MessageResponse::new("Record removed")))
}
