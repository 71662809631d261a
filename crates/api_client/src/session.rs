//! Client session state.

use serde::{Deserialize, Serialize};

use crate::UserAccount;

/// An authenticated client session: the bearer credential plus the cached
/// profile returned at login.
///
/// The session is explicit state owned by the [`crate::ApiClient`]; callers
/// load a persisted session at startup (`ApiClient::with_session`) and clear
/// it on logout. Logout is purely client-side: the credential stays valid
/// server-side until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential attached to every request.
    pub token: String,
    /// Profile of the logged-in user, as of login time.
    pub user: UserAccount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trips_through_json() {
        let session = Session {
            token: "token-123".to_string(),
            user: UserAccount {
                id: "user-1".to_string(),
                name: "Admin User".to_string(),
                email: "admin@movicare.com".to_string(),
                role: "admin".to_string(),
            },
        };

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.token, "token-123");
        assert_eq!(restored.user.email, "admin@movicare.com");
    }
}
