//! Presence heartbeat handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::presence::{CirclePresenceResponse, ConnectionType, HeartbeatRequest};
use domain::models::Presence;
use persistence::repositories::{CircleRepository, PresenceRepository};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub success: bool,
}

/// Record a presence heartbeat for the authenticated user.
///
/// PUT /api/v1/presence
pub async fn heartbeat(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let repo = PresenceRepository::new(state.pool.clone());
    repo.heartbeat(auth.user_id, request.connection_type.as_str())
        .await?;
    Ok(Json(HeartbeatResponse { success: true }))
}

/// Get online/offline status for every member of a circle.
///
/// GET /api/v1/circles/:circle_id/presence
pub async fn circle_presence(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<CirclePresenceResponse>, ApiError> {
    let circles = CircleRepository::new(state.pool.clone());
    if !circles.is_member(circle_id, auth.user_id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this circle".to_string(),
        ));
    }

    let now = Utc::now();
    let repo = PresenceRepository::new(state.pool.clone());
    let members = repo
        .for_circle(circle_id)
        .await?
        .into_iter()
        .map(|p| {
            let connection_type =
                ConnectionType::parse(&p.connection_type).unwrap_or_default();
            Presence {
                user_id: p.user_id,
                is_online: Presence::is_online(connection_type, p.last_seen, now),
                connection_type,
                last_seen: p.last_seen,
            }
        })
        .collect();

    Ok(Json(CirclePresenceResponse { members }))
}
