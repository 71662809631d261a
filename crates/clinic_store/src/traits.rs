//! Clinic store trait definitions.

use async_trait::async_trait;
use entities::{MedicalRecord, Patient, User};
use uuid::Uuid;

use crate::ClinicStoreResult;

/// Trait for clinic storage operations.
///
/// Uniqueness constraints (user email, patient cpf) are enforced by the
/// store itself: a write that would violate one fails with
/// `ClinicStoreError::UniqueViolation`, even when callers raced past any
/// existence check of their own.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails if the email is already taken.
    async fn create_user(&self, user: User) -> ClinicStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> ClinicStoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> ClinicStoreResult<Option<User>>;

    /// Lists all users, newest-created-first.
    async fn list_users(&self) -> ClinicStoreResult<Vec<User>>;

    /// Updates a user. Out-of-band only: no API route mutates users.
    async fn update_user(&self, user: User) -> ClinicStoreResult<User>;

    // =========================================================================
    // Patient operations
    // =========================================================================

    /// Creates a new patient. Fails if the cpf is already taken.
    async fn create_patient(&self, patient: Patient) -> ClinicStoreResult<Patient>;

    /// Gets a patient by ID.
    async fn get_patient(&self, id: Uuid) -> ClinicStoreResult<Option<Patient>>;

    /// Lists all patients, newest-created-first.
    async fn list_patients(&self) -> ClinicStoreResult<Vec<Patient>>;

    /// Updates a patient. Fails if the cpf collides with another patient.
    async fn update_patient(&self, patient: Patient) -> ClinicStoreResult<Patient>;

    /// Deletes a patient. Dependent medical records are left in place.
    async fn delete_patient(&self, id: Uuid) -> ClinicStoreResult<()>;

    // =========================================================================
    // Medical record operations
    // =========================================================================

    /// Creates a new medical record.
    async fn create_record(&self, record: MedicalRecord) -> ClinicStoreResult<MedicalRecord>;

    /// Gets a medical record by ID.
    async fn get_record(&self, id: Uuid) -> ClinicStoreResult<Option<MedicalRecord>>;

    /// Lists all medical records, newest-created-first.
    async fn list_records(&self) -> ClinicStoreResult<Vec<MedicalRecord>>;

    /// Lists medical records for a patient, newest-created-first. An unknown
    /// patient id yields an empty list.
    async fn list_records_for_patient(
        &self,
        patient_id: Uuid,
    ) -> ClinicStoreResult<Vec<MedicalRecord>>;

    /// Updates a medical record.
    async fn update_record(&self, record: MedicalRecord) -> ClinicStoreResult<MedicalRecord>;

    /// Deletes a medical record.
    async fn delete_record(&self, id: Uuid) -> ClinicStoreResult<()>;
}
