//! Medical record entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A clinical note filed against a patient by a therapist.
///
/// `therapist_name` is a denormalized snapshot of the referenced user's
/// display name, taken at the last write that touched `therapist_id`. It is
/// not kept in sync with later renames of the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning patient id. Not a live reference: the patient may have been
    /// deleted since this record was written.
    pub patient_id: Uuid,
    /// Description of the visit.
    pub description: String,
    /// Free-text clinical observations.
    #[serde(default)]
    pub observations: String,
    /// Authoring therapist id.
    pub therapist_id: Uuid,
    /// Snapshot of the therapist's display name.
    pub therapist_name: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    /// Creates a new medical record.
    pub fn new(
        patient_id: Uuid,
        description: impl Into<String>,
        observations: impl Into<String>,
        therapist_id: Uuid,
        therapist_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            patient_id,
            description: description.into(),
            observations: observations.into(),
            therapist_id,
            therapist_name: therapist_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
