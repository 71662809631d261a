//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator (can manage user accounts).
    Admin,
    /// Physiotherapist (files medical records).
    Physiotherapist,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Physiotherapist
    }
}

impl UserRole {
    /// Checks if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (unique across users).
    pub email: String,
    /// Salted password hash (PHC string). Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the public projection of this user (no password hash).
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: UserRole,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        user.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Dr. Maria Silva", "maria@movicare.com", "hash", UserRole::Physiotherapist);

        assert_eq!(user.name, "Dr. Maria Silva");
        assert_eq!(user.email, "maria@movicare.com");
        assert!(!user.role.is_admin());
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User::new("Admin", "admin@movicare.com", "secret-hash", UserRole::Admin);
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_role_serde() {
        let role: UserRole = serde_json::from_str("\"physiotherapist\"").unwrap();
        assert_eq!(role, UserRole::Physiotherapist);
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}
