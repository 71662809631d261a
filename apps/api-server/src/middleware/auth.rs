//! Authentication middleware.

use std::sync::Arc;

use auth::Claims;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use clinic_store::ClinicStore;
use entities::UserRole;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;

/// Authenticated caller identity, resolved from the bearer credential.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Account role.
    pub role: UserRole,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware.
///
/// Extracts the bearer credential from the Authorization header, validates
/// it, and stores the authenticated user in the request extensions. Requests
/// without a valid credential are rejected with 401.
pub async fn auth_middleware<S: ClinicStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => return ServerError::AuthenticationRequired.into_response(),
    };

    let claims = match state.jwt_manager.validate_token(token) {
        Ok(claims) => claims,
        Err(_) => return ServerError::AuthenticationRequired.into_response(),
    };

    match AuthenticatedUser::try_from(claims) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(_) => return ServerError::AuthenticationRequired.into_response(),
    }

    next.run(request).await
}

/// Rejects callers whose role is not admin. Applied after `auth_middleware`,
/// only on user-registration and user-listing operations.
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), ServerError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(ServerError::PermissionDenied(
            "Not authorized as admin".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "maria@movicare.com".to_string(),
            UserRole::Physiotherapist,
            24,
        );

        let user = AuthenticatedUser::try_from(claims).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "maria@movicare.com");
        assert_eq!(user.role, UserRole::Physiotherapist);
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "admin@movicare.com".to_string(),
            role: UserRole::Admin,
        };
        assert!(require_admin(&admin).is_ok());

        let therapist = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "maria@movicare.com".to_string(),
            role: UserRole::Physiotherapist,
        };
        assert!(require_admin(&therapist).is_err());
    }

    #[test]
    fn test_extract_token_missing_bearer() {
        let auth_header = "Basic credentials";
        let token = auth_header.strip_prefix("Bearer ");
        assert_eq!(token, None);
    }
}
