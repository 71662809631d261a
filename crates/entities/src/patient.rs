//! Patient entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person receiving care at the clinic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// National tax id (unique across patients).
    pub cpf: String,
    /// Birth date, YYYY-MM-DD.
    pub birth_date: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-text address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Creates a new patient.
    pub fn new(
        name: impl Into<String>,
        cpf: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cpf: cpf.into(),
            birth_date: birth_date.into(),
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_creation() {
        let patient = Patient::new("Ana Santos", "123.456.789-00", "1985-05-15")
            .with_phone("(11) 98765-4321")
            .with_address("Rua das Flores, 123 - São Paulo, SP");

        assert_eq!(patient.cpf, "123.456.789-00");
        assert_eq!(patient.phone.as_deref(), Some("(11) 98765-4321"));
    }

    #[test]
    fn test_patient_wire_format() {
        let patient = Patient::new("Ana", "111", "1990-01-01");
        let json = serde_json::to_value(&patient).unwrap();

        assert_eq!(json["birthDate"], "1990-01-01");
        assert!(json.get("createdAt").is_some());
        // Absent optional fields are omitted, not serialized as null
        assert!(json.get("phone").is_none());
    }
}
