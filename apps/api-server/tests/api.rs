//! End-to-end tests for the MoviCare REST API, driving the full router
//! against the in-memory store.

use std::sync::Arc;

use api_server::{config::Config, create_app, create_state, state::AppState};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use clinic_store::{ClinicStore, MemoryClinicStore};
use entities::{User, UserRole};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestContext {
    app: Router,
    state: Arc<AppState<MemoryClinicStore>>,
    admin: User,
    therapist: User,
}

impl TestContext {
    async fn new() -> Self {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: None,
            jwt_secret: "test-secret-key-must-be-long-enough".to_string(),
            jwt_expiration_hours: 24,
            seed_demo_data: false,
            log_level: "warn".to_string(),
        };

        let store = MemoryClinicStore::new();
        let password_hash = auth::hash_password("123456").unwrap();

        let admin = store
            .create_user(User::new(
                "Admin User",
                "admin@movicare.com",
                password_hash.clone(),
                UserRole::Admin,
            ))
            .await
            .unwrap();

        let therapist = store
            .create_user(User::new(
                "Dr. Maria Silva",
                "maria@movicare.com",
                password_hash,
                UserRole::Physiotherapist,
            ))
            .await
            .unwrap();

        let state = create_state(config, store);
        let app = create_app(state.clone());

        Self {
            app,
            state,
            admin,
            therapist,
        }
    }

    fn token_for(&self, user: &User) -> String {
        self.state
            .jwt_manager
            .generate_token(user.id, user.email.clone(), user.role)
            .unwrap()
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json");

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    /// Creates a patient through the API and returns its id.
    async fn create_patient(&self, token: &str, name: &str, cpf: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/patients",
                Some(token),
                Some(json!({ "name": name, "cpf": cpf, "birthDate": "1990-01-01" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn login_issues_token_and_rejects_bad_credentials_uniformly() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "maria@movicare.com", "password": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "maria@movicare.com");
    assert_eq!(body["role"], "physiotherapist");
    assert!(body["token"].as_str().is_some());
    assert!(body.get("passwordHash").is_none());

    // Wrong password and unknown email fail with the same message
    let (status, wrong_password) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "maria@movicare.com", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "nobody@movicare.com", "password": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn issued_token_works_against_protected_routes() {
    let ctx = TestContext::new().await;

    let (_, body) = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "maria@movicare.com", "password": "123456" })),
        )
        .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, profile) = ctx
        .send(Method::GET, "/api/users/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Dr. Maria Silva");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_invalid_credentials() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.send(Method::GET, "/api/patients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send(Method::GET, "/api/patients", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Token signed with a different secret
    let foreign = auth::JwtManager::new(auth::JwtConfig::new("another-secret-long-enough"))
        .generate_token(ctx.admin.id, ctx.admin.email.clone(), ctx.admin.role)
        .unwrap();
    let (status, _) = ctx
        .send(Method::GET, "/api/patients", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_are_forbidden_for_therapists() {
    let ctx = TestContext::new().await;
    let therapist_token = ctx.token_for(&ctx.therapist);

    let (status, _) = ctx
        .send(Method::GET, "/api/users", Some(&therapist_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/users",
            Some(&therapist_token),
            Some(json!({ "name": "X", "email": "x@movicare.com", "password": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = ctx.token_for(&ctx.admin);
    let (status, body) = ctx
        .send(Method::GET, "/api/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
}

#[tokio::test]
async fn register_user_validates_and_conflicts_on_email() {
    let ctx = TestContext::new().await;
    let admin_token = ctx.token_for(&ctx.admin);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/users",
            Some(&admin_token),
            Some(json!({
                "name": "Dr. João Pereira",
                "email": "joao@movicare.com",
                "password": "123456",
                "role": "physiotherapist"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "physiotherapist");

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/users",
            Some(&admin_token),
            Some(json!({ "name": "", "email": "a@movicare.com", "password": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/users",
            Some(&admin_token),
            Some(json!({ "name": "Dup", "email": "joao@movicare.com", "password": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn duplicate_cpf_is_a_conflict_and_does_not_alter_the_store() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    ctx.create_patient(&token, "Ana Santos", "111").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/patients",
            Some(&token),
            Some(json!({ "name": "Outra Ana", "cpf": "111", "birthDate": "1991-02-02" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Patient with this CPF already exists");

    let patients = ctx.state.store.list_patients().await.unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name, "Ana Santos");
}

#[tokio::test]
async fn partial_update_only_replaces_supplied_nonempty_fields() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let id = ctx.create_patient(&token, "Ana Santos", "111").await;

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/patients/{id}"),
            Some(&token),
            Some(json!({ "name": "", "phone": "(11) 98765-4321" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    // Empty name is falsy: the stored value survives
    assert_eq!(body["name"], "Ana Santos");
    assert_eq!(body["phone"], "(11) 98765-4321");
    assert_eq!(body["cpf"], "111");
    assert_eq!(body["birthDate"], "1990-01-01");

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/patients/{id}"),
            Some(&token),
            Some(json!({ "name": "Ana S. Oliveira" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana S. Oliveira");
    // Fields omitted entirely are untouched
    assert_eq!(body["phone"], "(11) 98765-4321");

    let (status, _) = ctx
        .send(
            Method::PUT,
            "/api/patients/00000000-0000-0000-0000-000000000000",
            Some(&token),
            Some(json!({ "name": "X" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_patient_orphans_its_records() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let patient_id = ctx.create_patient(&token, "Ana Santos", "111").await;

    let (status, record) = ctx
        .send(
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({
                "patientId": patient_id,
                "description": "Avaliação inicial",
                "therapistId": ctx.therapist.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let record_id = record["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            Method::DELETE,
            &format!("/api/patients/{patient_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient removed");

    // No cascade: the record survives and stays readable
    let (status, body) = ctx
        .send(
            Method::GET,
            &format!("/api/records/patient/{patient_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .send(
            Method::GET,
            &format!("/api/records/{record_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn record_with_unknown_therapist_fails_and_persists_nothing() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let patient_id = ctx.create_patient(&token, "Ana Santos", "111").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({
                "patientId": patient_id,
                "description": "Avaliação inicial",
                "therapistId": "00000000-0000-0000-0000-000000000000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Therapist not found");

    assert!(ctx.state.store.list_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn therapist_name_is_a_snapshot_refreshed_only_on_reassignment() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let patient_id = ctx.create_patient(&token, "Ana Santos", "111").await;

    let (status, record) = ctx
        .send(
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({
                "patientId": patient_id,
                "description": "Avaliação inicial",
                "therapistId": ctx.therapist.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["therapistName"], "Dr. Maria Silva");
    let record_id = record["id"].as_str().unwrap().to_string();

    // Rename the therapist out-of-band
    let mut renamed = ctx.therapist.clone();
    renamed.name = "Dr. Maria Souza".to_string();
    ctx.state.store.update_user(renamed).await.unwrap();

    // Re-sending the same therapist id does not refresh the snapshot
    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/records/{record_id}"),
            Some(&token),
            Some(json!({ "therapistId": ctx.therapist.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["therapistName"], "Dr. Maria Silva");

    // Reassigning to a different therapist snapshots that user's current name
    let other = ctx
        .state
        .store
        .create_user(User::new(
            "Dr. João Pereira",
            "joao@movicare.com",
            "hash".to_string(),
            UserRole::Physiotherapist,
        ))
        .await
        .unwrap();

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/records/{record_id}"),
            Some(&token),
            Some(json!({ "therapistId": other.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["therapistName"], "Dr. João Pereira");
    assert_eq!(body["therapistId"], other.id.to_string());

    // Reassigning to an unknown therapist is rejected
    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/records/{record_id}"),
            Some(&token),
            Some(json!({ "therapistId": "00000000-0000-0000-0000-000000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn records_for_unknown_patient_is_an_empty_list() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let (status, body) = ctx
        .send(
            Method::GET,
            "/api/records/patient/00000000-0000-0000-0000-000000000000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn end_to_end_patient_and_record_flow() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let (status, patient) = ctx
        .send(
            Method::POST,
            "/api/patients",
            Some(&token),
            Some(json!({ "name": "Ana", "cpf": "111", "birthDate": "1990-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let patient_id = patient["id"].as_str().unwrap().to_string();

    let (status, record) = ctx
        .send(
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({
                "patientId": patient_id,
                "description": "Avaliação inicial",
                "observations": "Sem queixas prévias.",
                "therapistId": ctx.therapist.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["therapistName"], "Dr. Maria Silva");

    let (status, body) = ctx
        .send(
            Method::GET,
            &format!("/api/records/patient/{patient_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], record["id"]);
}

#[tokio::test]
async fn record_deletion_is_independent() {
    let ctx = TestContext::new().await;
    let token = ctx.token_for(&ctx.therapist);

    let patient_id = ctx.create_patient(&token, "Ana Santos", "111").await;

    let (_, record) = ctx
        .send(
            Method::POST,
            "/api/records",
            Some(&token),
            Some(json!({
                "patientId": patient_id,
                "description": "Avaliação inicial",
                "therapistId": ctx.therapist.id
            })),
        )
        .await;
    let record_id = record["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(
            Method::DELETE,
            &format!("/api/records/{record_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record removed");

    // The patient is untouched
    let (status, _) = ctx
        .send(
            Method::GET,
            &format!("/api/patients/{patient_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(
            Method::DELETE,
            &format!("/api/records/{record_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
