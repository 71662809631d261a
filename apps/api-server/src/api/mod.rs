//! API endpoints.

pub mod patients;
pub mod records;
pub mod users;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use clinic_store::ClinicStore;
use serde::Serialize;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Body for operations that only confirm completion (e.g. deletes).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Creates the API router with all endpoints.
pub fn create_router<S: ClinicStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let public = Router::new()
        .route("/api/users/login", post(users::login))
        .route("/health", get(health_check));

    let protected = Router::new()
        // User endpoints
        .route("/api/users", post(users::register_user).get(users::list_users))
        .route("/api/users/profile", get(users::get_profile))
        // Patient endpoints
        .route(
            "/api/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/api/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        // Medical record endpoints
        .route(
            "/api/records",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/api/records/patient/:patient_id",
            get(records::list_records_for_patient),
        )
        .route(
            "/api/records/:id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware::<S>));

    public.merge(protected).with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
