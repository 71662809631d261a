//! In-memory clinic store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{MedicalRecord, Patient, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{ClinicStore, ClinicStoreError, ClinicStoreResult};

/// In-memory clinic store.
///
/// Uniqueness checks run under the write lock, so they are atomic with the
/// insert they guard.
#[derive(Debug, Default)]
pub struct MemoryClinicStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    patients: Arc<RwLock<HashMap<Uuid, Patient>>>,
    records: Arc<RwLock<HashMap<Uuid, MedicalRecord>>>,
}

impl MemoryClinicStore {
    /// Creates a new in-memory clinic store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F: Fn(&T) -> chrono::DateTime<chrono::Utc>>(mut items: Vec<T>, created_at: F) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl ClinicStore for MemoryClinicStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> ClinicStoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(ClinicStoreError::unique_violation(
                "User",
                "id",
                user.id.to_string(),
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(ClinicStoreError::unique_violation(
                "User",
                "email",
                user.email.clone(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> ClinicStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> ClinicStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> ClinicStoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(newest_first(users.values().cloned().collect(), |u| {
            u.created_at
        }))
    }

    async fn update_user(&self, user: User) -> ClinicStoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(ClinicStoreError::not_found("User", user.id.to_string()));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(ClinicStoreError::unique_violation(
                "User",
                "email",
                user.email.clone(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    // =========================================================================
    // Patient operations
    // =========================================================================

    async fn create_patient(&self, patient: Patient) -> ClinicStoreResult<Patient> {
        let mut patients = self.patients.write().await;
        if patients.contains_key(&patient.id) {
            return Err(ClinicStoreError::unique_violation(
                "Patient",
                "id",
                patient.id.to_string(),
            ));
        }
        if patients.values().any(|p| p.cpf == patient.cpf) {
            return Err(ClinicStoreError::unique_violation(
                "Patient",
                "cpf",
                patient.cpf.clone(),
            ));
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn get_patient(&self, id: Uuid) -> ClinicStoreResult<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.get(&id).cloned())
    }

    async fn list_patients(&self) -> ClinicStoreResult<Vec<Patient>> {
        let patients = self.patients.read().await;
        Ok(newest_first(patients.values().cloned().collect(), |p| {
            p.created_at
        }))
    }

    async fn update_patient(&self, patient: Patient) -> ClinicStoreResult<Patient> {
        let mut patients = self.patients.write().await;
        if !patients.contains_key(&patient.id) {
            return Err(ClinicStoreError::not_found(
                "Patient",
                patient.id.to_string(),
            ));
        }
        if patients
            .values()
            .any(|p| p.id != patient.id && p.cpf == patient.cpf)
        {
            return Err(ClinicStoreError::unique_violation(
                "Patient",
                "cpf",
                patient.cpf.clone(),
            ));
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicStoreResult<()> {
        let mut patients = self.patients.write().await;
        if patients.remove(&id).is_none() {
            return Err(ClinicStoreError::not_found("Patient", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Medical record operations
    // =========================================================================

    async fn create_record(&self, record: MedicalRecord) -> ClinicStoreResult<MedicalRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(ClinicStoreError::unique_violation(
                "Record",
                "id",
                record.id.to_string(),
            ));
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_record(&self, id: Uuid) -> ClinicStoreResult<Option<MedicalRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list_records(&self) -> ClinicStoreResult<Vec<MedicalRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(records.values().cloned().collect(), |r| {
            r.created_at
        }))
    }

    async fn list_records_for_patient(
        &self,
        patient_id: Uuid,
    ) -> ClinicStoreResult<Vec<MedicalRecord>> {
        let records = self.records.read().await;
        Ok(newest_first(
            records
                .values()
                .filter(|r| r.patient_id == patient_id)
                .cloned()
                .collect(),
            |r| r.created_at,
        ))
    }

    async fn update_record(&self, record: MedicalRecord) -> ClinicStoreResult<MedicalRecord> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(ClinicStoreError::not_found("Record", record.id.to_string()));
        }
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_record(&self, id: Uuid) -> ClinicStoreResult<()> {
        let mut records = self.records.write().await;
        if records.remove(&id).is_none() {
            return Err(ClinicStoreError::not_found("Record", id.to_string()));
        }
        Ok(())
    }
}
