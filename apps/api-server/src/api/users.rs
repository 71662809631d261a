//! User and authentication API endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use clinic_store::{ClinicStore, ClinicStoreError};
use entities::{User, UserProfile, UserRole};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::middleware::{require_admin, AuthenticatedUser};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the public profile plus the bearer credential.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
}

/// User registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Runs password hashing on the blocking pool so request handling stays
/// responsive.
async fn hash_password(password: String) -> ServerResult<String> {
    let hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> ServerResult<bool> {
    let matches = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .unwrap_or(false);
    Ok(matches)
}

/// Issues a bearer credential for a known email/password pair.
pub async fn login<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<LoginResponse>> {
    // Unknown email and wrong password fail identically
    let user = state
        .store
        .get_user_by_email(&request.email)
        .await?
        .ok_or(ServerError::InvalidCredentials)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(ServerError::InvalidCredentials);
    }

    let token = state
        .jwt_manager
        .generate_token(user.id, user.email.clone(), user.role)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: UserProfile::from(&user),
        token,
    }))
}

/// Registers a new user. Admin only.
pub async fn register_user<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(request): Json<RegisterUserRequest>,
) -> ServerResult<(StatusCode, Json<UserProfile>)> {
    require_admin(&caller)?;

    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(ServerError::Validation("Invalid user data".to_string()));
    }

    let password_hash = hash_password(request.password).await?;
    let user = User::new(request.name, request.email, password_hash, request.role);

    let created = match state.store.create_user(user).await {
        Ok(user) => user,
        Err(ClinicStoreError::UniqueViolation { .. }) => {
            return Err(ServerError::Conflict(
                "User with this email already exists".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %created.id, role = ?created.role, "User registered");

    Ok((StatusCode::CREATED, Json(UserProfile::from(&created))))
}

/// Lists all users. Admin only.
pub async fn list_users<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ServerResult<Json<Vec<UserProfile>>> {
    require_admin(&caller)?;

    let users = state.store.list_users().await?;

    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

/// Returns the authenticated caller's public profile.
pub async fn get_profile<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserProfile>> {
    let user = state
        .store
        .get_user(caller.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(UserProfile::from(&user)))
}
