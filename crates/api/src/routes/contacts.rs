//! Arrival-contact endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::contact::{CreateContactRequest, IncomingShare, ListContactsResponse};
use domain::models::notification::NotificationKind;
use domain::models::Contact;
use persistence::repositories::{ContactRepository, NotificationRepository, UserRepository};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIncomingResponse {
    pub shares: Vec<IncomingShare>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContactResponse {
    pub success: bool,
}

/// Create (or reset) a share toward one recipient.
///
/// Re-creating a share for the same recipient resets its progress, so the
/// arrival notifications fire again for the new journey.
///
/// POST /api/v1/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    request.validate()?;

    // Link eagerly when the recipient already has an account.
    let users = UserRepository::new(state.pool.clone());
    let recipient_id = users
        .find_by_email(&request.recipient_email)
        .await?
        .map(|u| u.id);

    let contacts = ContactRepository::new(state.pool.clone());
    let entity = contacts
        .create(
            auth.user_id,
            &request.recipient_email,
            recipient_id,
            request.destination_latitude,
            request.destination_longitude,
            request.destination_name.as_deref(),
        )
        .await?;

    // Tell a recipient with an account that the journey started.
    if let Some(recipient_id) = recipient_id {
        let owner_name = users
            .find_by_id(auth.user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "Someone".to_string());
        let kind = NotificationKind::Left;
        let title = kind.title("");
        let body = kind.body(&owner_name, 0, "");
        let notifications = NotificationRepository::new(state.pool.clone());
        if let Err(e) = notifications
            .enqueue(recipient_id, Some(auth.user_id), kind, &title, &body)
            .await
        {
            warn!(error = %e, recipient_id = %recipient_id, "Failed to queue departure notification");
        } else {
            crate::middleware::metrics::record_notifications_queued(1);
        }
    }

    info!(contact_id = %entity.id, owner_id = %auth.user_id, "Share created");

    Ok(Json(entity.into()))
}

/// List the authenticated user's outgoing shares.
///
/// GET /api/v1/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListContactsResponse>, ApiError> {
    let contacts = ContactRepository::new(state.pool.clone());
    let list = contacts
        .list_by_owner(auth.user_id)
        .await?
        .into_iter()
        .map(Contact::from)
        .collect();

    Ok(Json(ListContactsResponse { contacts: list }))
}

/// List shares aimed at the authenticated user.
///
/// Matches on the linked recipient id and on the account email, so shares
/// created before the account existed still show up.
///
/// GET /api/v1/contacts/incoming
pub async fn list_incoming(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListIncomingResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let contacts = ContactRepository::new(state.pool.clone());
    let shares = contacts
        .list_incoming(auth.user_id, &user.email)
        .await?
        .into_iter()
        .map(IncomingShare::from)
        .collect();

    Ok(Json(ListIncomingResponse { shares }))
}

/// Deactivate the share toward one recipient.
///
/// DELETE /api/v1/contacts/:email
pub async fn delete_contact(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(email): Path<String>,
) -> Result<Json<DeleteContactResponse>, ApiError> {
    let contacts = ContactRepository::new(state.pool.clone());
    let deleted = contacts
        .delete_by_recipient_email(auth.user_id, &email)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("No active share for this recipient".to_string()));
    }

    info!(owner_id = %auth.user_id, "Share deactivated");
    Ok(Json(DeleteContactResponse { success: true }))
}
