//! Emergency SOS broadcast handler.

use std::collections::HashSet;

use axum::{extract::State, Json};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::sos::{maps_link, SendSosRequest, SendSosResponse};
use domain::models::NotificationKind;
use persistence::repositories::{
    CircleRepository, MailRepository, NotificationRepository, SosRepository, UserRepository,
};

/// Broadcast an SOS to every member of every circle the sender belongs to.
///
/// Per-recipient failures are logged and skipped so one bad row cannot
/// block an emergency broadcast.
///
/// POST /api/v1/sos
pub async fn send_sos(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<SendSosRequest>,
) -> Result<Json<SendSosResponse>, ApiError> {
    request.validate()?;

    let circles = CircleRepository::new(state.pool.clone());
    let circle_ids = circles.user_circle_ids(auth.user_id).await?;
    if circle_ids.is_empty() {
        return Err(ApiError::Validation("You are not in any circles".to_string()));
    }

    // A member shared across circles gets exactly one notification.
    let mut recipients: HashSet<Uuid> = HashSet::new();
    for circle_id in &circle_ids {
        for member_id in circles.member_ids_excluding(*circle_id, auth.user_id).await? {
            recipients.insert(member_id);
        }
    }

    let users = UserRepository::new(state.pool.clone());
    let sender = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let link = maps_link(request.latitude, request.longitude);
    let kind = NotificationKind::Sos;
    let title = kind.title("");
    let body = kind.body(&sender.name, 0, &link);

    let notifications = NotificationRepository::new(state.pool.clone());
    let mail = MailRepository::new(state.pool.clone());
    let subject = format!("🚨 EMERGENCY SOS from {}", sender.name);
    let html_body = format!(
        "<h2>{title}</h2><p>{body}</p><p><a href=\"{link}\">Open in Maps</a></p>"
    );

    let mut notified: i32 = 0;
    for recipient_id in &recipients {
        match notifications
            .enqueue(*recipient_id, Some(auth.user_id), kind, &title, &body)
            .await
        {
            Ok(_) => notified += 1,
            Err(e) => {
                warn!(error = %e, recipient_id = %recipient_id, "Failed to queue SOS notification");
                continue;
            }
        }

        match users.find_by_id(*recipient_id).await {
            Ok(Some(recipient)) => {
                if let Err(e) = mail.enqueue(&recipient.email, &subject, &html_body).await {
                    warn!(error = %e, recipient_id = %recipient_id, "Failed to queue SOS email");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, recipient_id = %recipient_id, "Failed to resolve SOS recipient");
            }
        }
    }

    let sos = SosRepository::new(state.pool.clone());
    if let Err(e) = sos
        .record(auth.user_id, request.latitude, request.longitude, &link, notified)
        .await
    {
        // The broadcast already went out; losing the record is not fatal.
        error!(error = %e, "Failed to record SOS event");
    }

    crate::middleware::metrics::record_sos_broadcast();
    info!(
        sender_id = %auth.user_id,
        recipients = notified,
        "SOS broadcast"
    );

    Ok(Json(SendSosResponse {
        success: true,
        notifications_sent: notified,
        maps_link: link,
    }))
}
