//! Location endpoint handlers.
//!
//! A single upload fans the fix out to every circle the user belongs to,
//! refreshes their presence heartbeat, and runs the arrival check for each
//! active outgoing share.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{TimeZone, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::location::{LastLocation, UploadLocationRequest, UploadLocationResponse};
use domain::models::presence::ConnectionType;
use domain::services::{evaluate_share, ArrivalEvent};
use domain::models::NotificationKind;
use persistence::repositories::{
    CircleRepository, ContactRepository, LocationRepository, NotificationRepository,
    PresenceRepository, UserRepository,
};

/// Upload a position fix.
///
/// POST /api/v1/locations
pub async fn upload_location(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UploadLocationRequest>,
) -> Result<Json<UploadLocationResponse>, ApiError> {
    request.validate()?;

    let captured_at = Utc
        .timestamp_millis_opt(request.timestamp)
        .single()
        .ok_or_else(|| ApiError::Validation("Invalid timestamp".to_string()))?;

    let circles = CircleRepository::new(state.pool.clone());
    let circle_ids = circles.user_circle_ids(auth.user_id).await?;

    // One row per (user, circle); each upload overwrites the previous fix.
    let locations = LocationRepository::new(state.pool.clone());
    for circle_id in &circle_ids {
        locations
            .upsert(
                auth.user_id,
                *circle_id,
                request.latitude,
                request.longitude,
                request.speed,
                request.accuracy,
                request.battery_level,
                request.is_charging,
                captured_at,
            )
            .await?;
    }
    crate::middleware::metrics::record_locations_fanned_out(circle_ids.len());

    // A position fix doubles as a heartbeat.
    let presence = PresenceRepository::new(state.pool.clone());
    if let Err(e) = presence
        .heartbeat(auth.user_id, ConnectionType::Active.as_str())
        .await
    {
        warn!(error = %e, "Failed to record heartbeat from location upload");
    }

    let notifications_dispatched = run_arrival_checks(
        &state,
        auth.user_id,
        request.latitude,
        request.longitude,
        request.speed,
    )
    .await?;

    info!(
        user_id = %auth.user_id,
        circles = circle_ids.len(),
        notifications = notifications_dispatched,
        "Location uploaded"
    );

    Ok(Json(UploadLocationResponse {
        success: true,
        circles_updated: circle_ids.len(),
        notifications_dispatched,
    }))
}

/// Evaluate every active outgoing share against the new position and queue
/// the one-shot arrival notifications it produces.
async fn run_arrival_checks(
    state: &AppState,
    owner_id: Uuid,
    latitude: f64,
    longitude: f64,
    speed: f64,
) -> Result<usize, ApiError> {
    let contacts = ContactRepository::new(state.pool.clone());
    let shares = contacts.list_active_by_owner(owner_id).await?;
    if shares.is_empty() {
        return Ok(0);
    }

    let users = UserRepository::new(state.pool.clone());
    let owner_name = users
        .find_by_id(owner_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| "Someone".to_string());

    let notifications = NotificationRepository::new(state.pool.clone());
    let now = Utc::now();
    let mut dispatched = 0;

    for share in shares {
        let Some(evaluation) = evaluate_share(
            share.progress(),
            share.last_evaluated_at,
            now,
            latitude,
            longitude,
            share.destination_latitude,
            share.destination_longitude,
            speed,
        ) else {
            // Evaluated too recently; skip until the interval elapses.
            continue;
        };

        let mut all_queued = true;
        for event in &evaluation.events {
            let kind = match event {
                ArrivalEvent::Near { .. } => NotificationKind::TwoMinutes,
                ArrivalEvent::Arrived => NotificationKind::Arrived,
            };
            let title = kind.title("");
            let body = kind.body(&owner_name, evaluation.eta_minutes, "");

            match share.recipient_id {
                Some(recipient_id) => {
                    match notifications
                        .enqueue(recipient_id, Some(owner_id), kind, &title, &body)
                        .await
                    {
                        Ok(_) => dispatched += 1,
                        Err(e) => {
                            warn!(error = %e, contact_id = %share.id, "Failed to queue arrival notification");
                            all_queued = false;
                        }
                    }
                }
                None => {
                    // Recipient has no account yet; nothing to push to.
                    warn!(contact_id = %share.id, "Arrival event for unlinked recipient dropped");
                }
            }
        }

        // A queue failure leaves the row untouched so the next fix retries
        // the whole evaluation.
        if !all_queued {
            continue;
        }

        // Persisted with a monotonic guard, so a concurrent upload cannot
        // move progress backwards or re-fire an event.
        contacts
            .record_evaluation(share.id, evaluation.progress, evaluation.eta_minutes, now)
            .await?;
    }

    crate::middleware::metrics::record_notifications_queued(dispatched);
    Ok(dispatched)
}

/// Get another user's latest known position.
///
/// Allowed only when the two users share at least one circle.
///
/// GET /api/v1/locations/:user_id
pub async fn get_last_location(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LastLocation>, ApiError> {
    if user_id != auth.user_id {
        let circles = CircleRepository::new(state.pool.clone());
        let mine = circles.user_circle_ids(auth.user_id).await?;
        let theirs = circles.user_circle_ids(user_id).await?;
        if !mine.iter().any(|id| theirs.contains(id)) {
            return Err(ApiError::Forbidden(
                "You do not share a circle with this user".to_string(),
            ));
        }
    }

    let locations = LocationRepository::new(state.pool.clone());
    let latest = locations
        .latest_for_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No location known for this user".to_string()))?;

    Ok(Json(LastLocation {
        user_id: latest.user_id,
        latitude: latest.latitude,
        longitude: latest.longitude,
        speed: latest.speed,
        captured_at: latest.captured_at,
    }))
}
