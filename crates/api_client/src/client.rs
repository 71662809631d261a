//! HTTP client for the MoviCare API.

use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    ClientError, ClientResult, MedicalRecord, NewPatient, NewRecord, NewUser, Patient,
    PatientUpdate, RecordUpdate, Session, UserAccount,
};

/// Fallback shown when the server's error body carries no usable message.
const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Error body shape returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Login response: the public profile plus the bearer credential.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserAccount,
    token: String,
}

/// Pulls a human-readable message out of an error response body, falling
/// back to a generic one.
fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

/// Client for the MoviCare API.
///
/// Holds the session explicitly: load one at startup with
/// [`ApiClient::with_session`], obtain one via [`ApiClient::login`], drop it
/// with [`ApiClient::logout`]. When a session is present its token is
/// attached to every request.
pub struct ApiClient {
    /// Server base URL (e.g. `http://localhost:5000`).
    base_url: String,
    /// HTTP client.
    http: reqwest::Client,
    /// Current session, if logged in.
    session: RwLock<Option<Session>>,
}

impl ApiClient {
    /// Creates a new client with no session.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session: RwLock::new(None),
        }
    }

    /// Creates a new client with a previously persisted session.
    pub fn with_session(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session: RwLock::new(Some(session)),
        }
    }

    /// Returns a copy of the current session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Logs in and stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let response = self
            .http
            .post(format!("{}/api/users/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let login: LoginResponse = Self::handle(response).await?;
        let session = Session {
            token: login.token,
            user: login.user,
        };

        *self.session.write().await = Some(session.clone());

        debug!(email = %email, "Logged in");

        Ok(session)
    }

    /// Clears the session. The credential is not revoked server-side; it
    /// keeps working until it expires if replayed.
    pub async fn logout(&self) {
        *self.session.write().await = None;
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registers a new user (admin only).
    pub async fn register_user(&self, user: &NewUser) -> ClientResult<UserAccount> {
        self.call(Method::POST, "/api/users", Some(user)).await
    }

    /// Lists all users (admin only).
    pub async fn list_users(&self) -> ClientResult<Vec<UserAccount>> {
        self.call::<(), _>(Method::GET, "/api/users", None).await
    }

    /// Fetches the logged-in user's profile.
    pub async fn profile(&self) -> ClientResult<UserAccount> {
        self.call::<(), _>(Method::GET, "/api/users/profile", None)
            .await
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Lists all patients, newest-first.
    pub async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        self.call::<(), _>(Method::GET, "/api/patients", None).await
    }

    /// Fetches one patient.
    pub async fn get_patient(&self, id: &str) -> ClientResult<Patient> {
        self.call::<(), _>(Method::GET, &format!("/api/patients/{id}"), None)
            .await
    }

    /// Registers a patient.
    pub async fn create_patient(&self, patient: &NewPatient) -> ClientResult<Patient> {
        self.call(Method::POST, "/api/patients", Some(patient)).await
    }

    /// Partially updates a patient.
    pub async fn update_patient(&self, id: &str, update: &PatientUpdate) -> ClientResult<Patient> {
        self.call(Method::PUT, &format!("/api/patients/{id}"), Some(update))
            .await
    }

    /// Deletes a patient.
    pub async fn delete_patient(&self, id: &str) -> ClientResult<()> {
        self.call::<(), serde_json::Value>(Method::DELETE, &format!("/api/patients/{id}"), None)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Medical records
    // =========================================================================

    /// Lists all medical records, newest-first.
    pub async fn list_records(&self) -> ClientResult<Vec<MedicalRecord>> {
        self.call::<(), _>(Method::GET, "/api/records", None).await
    }

    /// Lists a patient's records, newest-first.
    pub async fn list_records_for_patient(
        &self,
        patient_id: &str,
    ) -> ClientResult<Vec<MedicalRecord>> {
        self.call::<(), _>(
            Method::GET,
            &format!("/api/records/patient/{patient_id}"),
            None,
        )
        .await
    }

    /// Fetches one medical record.
    pub async fn get_record(&self, id: &str) -> ClientResult<MedicalRecord> {
        self.call::<(), _>(Method::GET, &format!("/api/records/{id}"), None)
            .await
    }

    /// Files a medical record.
    pub async fn create_record(&self, record: &NewRecord) -> ClientResult<MedicalRecord> {
        self.call(Method::POST, "/api/records", Some(record)).await
    }

    /// Partially updates a medical record.
    pub async fn update_record(
        &self,
        id: &str,
        update: &RecordUpdate,
    ) -> ClientResult<MedicalRecord> {
        self.call(Method::PUT, &format!("/api/records/{id}"), Some(update))
            .await
    }

    /// Deletes a medical record.
    pub async fn delete_record(&self, id: &str) -> ClientResult<()> {
        self.call::<(), serde_json::Value>(Method::DELETE, &format!("/api/records/{id}"), None)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Sends a request, attaching the session token when present, and
    /// decodes the response.
    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        debug!(method = %method, path = %path, "API request");

        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        if let Some(session) = self.session.read().await.as_ref() {
            builder = builder.bearer_auth(&session.token);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::handle(response).await
    }

    /// Decodes a response, surfacing the server's `{ message }` on failure.
    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: extract_message(&bytes),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_extract_message_from_error_body() {
        assert_eq!(
            extract_message(br#"{"message":"Patient not found"}"#),
            "Patient not found"
        );
    }

    #[test]
    fn test_extract_message_falls_back_on_garbage() {
        assert_eq!(extract_message(b"<html>oops</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(br#"{"message":""}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(br#"{}"#), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let client = ApiClient::new("http://localhost:5000");
        assert!(client.session().await.is_none());

        let session = Session {
            token: "token-123".to_string(),
            user: UserAccount {
                id: "u-1".to_string(),
                name: "Admin User".to_string(),
                email: "admin@movicare.com".to_string(),
                role: "admin".to_string(),
            },
        };
        *client.session.write().await = Some(session);
        assert!(client.session().await.is_some());

        client.logout().await;
        assert!(client.session().await.is_none());
    }
}
