//! Circle endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::circle::{
    CircleMember, CircleResponse, CreateCircleRequest, JoinCircleRequest, ListCirclesResponse,
    RosterResponse,
};
use domain::models::presence::ConnectionType;
use domain::models::{NotificationKind, Presence};
use persistence::repositories::{
    CircleRepository, LocationRepository, NotificationRepository, UserRepository,
};
use shared::crypto::generate_invite_code;

const INVITE_CODE_ATTEMPTS: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCircleResponse {
    pub success: bool,
    /// True when the departing member was the last one and the circle
    /// was removed along with them.
    pub circle_deleted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCircleResponse {
    pub success: bool,
}

/// Create a circle with a fresh invite code.
///
/// POST /api/v1/circles
pub async fn create_circle(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateCircleRequest>,
) -> Result<Json<CircleResponse>, ApiError> {
    request.validate()?;

    let repo = CircleRepository::new(state.pool.clone());

    // Invite codes are random, so collisions are possible; retry with a
    // new code when the unique constraint fires.
    let mut last_err = None;
    for _ in 0..INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code();
        match repo.create_circle(&request.name, &code, auth.user_id).await {
            Ok(circle) => {
                info!(circle_id = %circle.id, user_id = %auth.user_id, "Circle created");
                return Ok(Json(CircleResponse {
                    id: circle.id,
                    name: circle.name,
                    created_by: circle.created_by,
                    invite_code: circle.invite_code,
                    member_count: 1,
                    created_at: circle.created_at,
                }));
            }
            Err(e) if is_unique_violation(&e) => {
                last_err = Some(e);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    warn!("Exhausted invite code attempts");
    Err(last_err
        .map(ApiError::from)
        .unwrap_or_else(|| ApiError::Internal("Failed to create circle".to_string())))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// List the circles the authenticated user belongs to.
///
/// GET /api/v1/circles
pub async fn list_circles(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListCirclesResponse>, ApiError> {
    let repo = CircleRepository::new(state.pool.clone());
    let circles = repo
        .list_user_circles(auth.user_id)
        .await?
        .into_iter()
        .map(|c| CircleResponse {
            id: c.id,
            name: c.name,
            created_by: c.created_by,
            invite_code: c.invite_code,
            member_count: c.member_count,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(ListCirclesResponse { circles }))
}

/// Join a circle by invite code.
///
/// Existing members get a "new member" notification so the roster change
/// does not go unnoticed.
///
/// POST /api/v1/circles/join
pub async fn join_circle(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<JoinCircleRequest>,
) -> Result<Json<CircleResponse>, ApiError> {
    request.validate()?;

    let repo = CircleRepository::new(state.pool.clone());
    let circle = repo
        .find_by_invite_code(&request.invite_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invalid invite code".to_string()))?;

    // Members before the join; the joiner is not among them yet.
    let existing_members = repo.member_ids_excluding(circle.id, auth.user_id).await?;

    // Re-joining is a no-op: return the circle without another fan-out.
    if repo.is_member(circle.id, auth.user_id).await? {
        return Ok(Json(CircleResponse {
            id: circle.id,
            name: circle.name,
            created_by: circle.created_by,
            invite_code: circle.invite_code,
            member_count: existing_members.len() as i64 + 1,
            created_at: circle.created_at,
        }));
    }

    if existing_members.len() as i64 >= state.config.limits.max_circle_members {
        return Err(ApiError::Conflict("Circle is full".to_string()));
    }

    repo.add_member(circle.id, auth.user_id).await?;

    info!(circle_id = %circle.id, user_id = %auth.user_id, "User joined circle");

    // Notify the members who were already in the circle.
    let users = UserRepository::new(state.pool.clone());
    let joiner_name = users
        .find_by_id(auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| "Someone".to_string());

    let notifications = NotificationRepository::new(state.pool.clone());
    let kind = NotificationKind::CircleJoin;
    let title = kind.title(&circle.name);
    let body = kind.body("", 0, &joiner_name);
    for member_id in &existing_members {
        if let Err(e) = notifications
            .enqueue(*member_id, Some(auth.user_id), kind, &title, &body)
            .await
        {
            warn!(error = %e, recipient_id = %member_id, "Failed to queue join notification");
        }
    }
    crate::middleware::metrics::record_notifications_queued(existing_members.len());

    let member_count = existing_members.len() as i64 + 1;
    Ok(Json(CircleResponse {
        id: circle.id,
        name: circle.name,
        created_by: circle.created_by,
        invite_code: circle.invite_code,
        member_count,
        created_at: circle.created_at,
    }))
}

/// Leave a circle. The last member to leave takes the circle with them.
///
/// POST /api/v1/circles/:circle_id/leave
pub async fn leave_circle(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<LeaveCircleResponse>, ApiError> {
    let repo = CircleRepository::new(state.pool.clone());
    let remaining = repo
        .remove_member(circle_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You are not a member of this circle".to_string()))?;

    // The departing member's location in this circle is no longer shared.
    let locations = LocationRepository::new(state.pool.clone());
    if let Err(e) = locations
        .delete_for_user_in_circle(auth.user_id, circle_id)
        .await
    {
        warn!(error = %e, "Failed to remove location after leaving circle");
    }

    info!(circle_id = %circle_id, user_id = %auth.user_id, remaining, "User left circle");

    Ok(Json(LeaveCircleResponse {
        success: true,
        circle_deleted: remaining == 0,
    }))
}

/// Delete a circle. Only the creator may do this.
///
/// DELETE /api/v1/circles/:circle_id
pub async fn delete_circle(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<DeleteCircleResponse>, ApiError> {
    let repo = CircleRepository::new(state.pool.clone());
    let circle = repo
        .find_by_id(circle_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    if circle.created_by != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the circle creator can delete it".to_string(),
        ));
    }

    repo.delete_circle(circle_id).await?;
    info!(circle_id = %circle_id, user_id = %auth.user_id, "Circle deleted");

    Ok(Json(DeleteCircleResponse { success: true }))
}

/// Get the circle roster with each member's latest location and presence.
///
/// GET /api/v1/circles/:circle_id/members
pub async fn get_members(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<RosterResponse>, ApiError> {
    let repo = CircleRepository::new(state.pool.clone());
    if !repo.is_member(circle_id, auth.user_id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this circle".to_string(),
        ));
    }

    let now = Utc::now();
    let members = repo
        .roster(circle_id)
        .await?
        .into_iter()
        .map(|m| {
            let connection_type = m
                .connection_type
                .as_deref()
                .and_then(ConnectionType::parse)
                .unwrap_or_default();
            CircleMember {
                user_id: m.user_id,
                name: m.name,
                email: m.email,
                latitude: m.latitude,
                longitude: m.longitude,
                last_updated: m.captured_at,
                is_active: CircleMember::is_fix_fresh(m.captured_at, now),
                is_online: m
                    .last_seen
                    .map(|seen| Presence::is_online(connection_type, seen, now))
                    .unwrap_or(false),
                battery_level: m.battery_level,
                is_charging: m.is_charging.unwrap_or(false),
            }
        })
        .collect();

    Ok(Json(RosterResponse { members }))
}
