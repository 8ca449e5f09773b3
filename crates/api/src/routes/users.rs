//! User profile and discovery endpoint handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::user::{
    LookupUsersRequest, LookupUsersResponse, UpdateFcmTokenRequest, UserResponse,
};
use domain::models::User;
use persistence::repositories::UserRepository;
use shared::crypto::hash_phone_number;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFcmTokenResponse {
    pub success: bool,
}

/// Get the authenticated user's profile.
///
/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user: User = entity.into();
    Ok(Json(user.into()))
}

/// Save the device's push-messaging registration token.
///
/// PUT /api/v1/users/me/fcm-token
pub async fn update_fcm_token(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UpdateFcmTokenRequest>,
) -> Result<Json<UpdateFcmTokenResponse>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let updated = repo.update_fcm_token(auth.user_id, &request.fcm_token).await?;
    if !updated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(UpdateFcmTokenResponse { success: true }))
}

/// Find registered users by phone number.
///
/// The client sends raw phone numbers; matching happens on their digests,
/// so the server never needs the address book in clear form beyond this
/// request.
///
/// POST /api/v1/users/lookup
pub async fn lookup_users(
    State(state): State<AppState>,
    _auth: UserAuth,
    Json(request): Json<LookupUsersRequest>,
) -> Result<Json<LookupUsersResponse>, ApiError> {
    request.validate()?;

    let hashes: Vec<String> = request
        .phone_numbers
        .iter()
        .map(|p| hash_phone_number(p))
        .collect();

    let repo = UserRepository::new(state.pool.clone());
    let users = repo
        .find_by_phone_hashes(&hashes)
        .await?
        .into_iter()
        .map(|entity| {
            let user: User = entity.into();
            user.into()
        })
        .collect();

    Ok(Json(LookupUsersResponse { users }))
}
