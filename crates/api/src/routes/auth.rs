//! Authentication endpoint handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService};
use domain::models::user::UserResponse;

/// Request payload for account registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    pub phone_number: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response payload for successful authentication.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("An account with this email already exists".to_string())
            }
            AuthError::WeakPassword(reason) => ApiError::Validation(reason),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::TokenError(e) => {
                tracing::error!(error = %e, "Failed to issue access token");
                ApiError::Internal("Failed to issue access token".to_string())
            }
            AuthError::PasswordError(e) => {
                tracing::error!(error = %e, "Failed to process password");
                ApiError::Internal("Failed to process password".to_string())
            }
            AuthError::DatabaseError(e) => e.into(),
        }
    }
}

/// Register a new account.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), &state.config.jwt);
    let result = service
        .register(
            &request.email,
            &request.name,
            &request.password,
            request.phone_number.as_deref(),
        )
        .await?;

    info!(user_id = %result.user.id, "User registered");

    Ok(Json(AuthResponse {
        user: result.user.into(),
        access_token: result.access_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}

/// Authenticate with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), &state.config.jwt);
    let result = service.login(&request.email, &request.password).await?;

    info!(user_id = %result.user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: result.user.into(),
        access_token: result.access_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            ApiError::from(AuthError::EmailAlreadyExists),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::WeakPassword("too short".to_string())),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn test_password_error_maps_to_internal_without_leaking_detail() {
        let inner = shared::password::PasswordError::InvalidHashFormat;
        let mapped = ApiError::from(AuthError::PasswordError(inner));
        match mapped {
            ApiError::Internal(message) => assert_eq!(message, "Failed to process password"),
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
