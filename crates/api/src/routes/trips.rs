//! Trip endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::trip::{ListTripsResponse, StartTripRequest};
use domain::models::Trip;
use persistence::repositories::{CircleRepository, TripRepository};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTripResponse {
    pub success: bool,
}

/// Start a trip toward a destination, visible to a circle.
///
/// POST /api/v1/trips
pub async fn start_trip(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<StartTripRequest>,
) -> Result<Json<Trip>, ApiError> {
    request.validate()?;

    let circles = CircleRepository::new(state.pool.clone());
    if !circles.is_member(request.circle_id, auth.user_id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this circle".to_string(),
        ));
    }

    let trips = TripRepository::new(state.pool.clone());
    let entity = trips
        .create(
            auth.user_id,
            request.circle_id,
            request.destination_latitude,
            request.destination_longitude,
            request.destination_name.as_deref(),
            &request.shared_with,
        )
        .await?;

    info!(trip_id = %entity.id, owner_id = %auth.user_id, "Trip started");

    Ok(Json(entity.into()))
}

/// List active trips in a circle visible to the requesting member.
///
/// GET /api/v1/circles/:circle_id/trips
pub async fn list_circle_trips(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(circle_id): Path<Uuid>,
) -> Result<Json<ListTripsResponse>, ApiError> {
    let circles = CircleRepository::new(state.pool.clone());
    if !circles.is_member(circle_id, auth.user_id).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this circle".to_string(),
        ));
    }

    let repo = TripRepository::new(state.pool.clone());
    let trips: Vec<Trip> = repo
        .list_active_for_circle(circle_id)
        .await?
        .into_iter()
        .map(Trip::from)
        .filter(|t| t.visible_to(auth.user_id))
        .collect();

    Ok(Json(ListTripsResponse { trips }))
}

/// List active trips explicitly shared with the authenticated user.
///
/// GET /api/v1/trips/shared-with-me
pub async fn list_shared_with_me(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListTripsResponse>, ApiError> {
    let repo = TripRepository::new(state.pool.clone());
    let trips = repo
        .list_shared_with_user(auth.user_id)
        .await?
        .into_iter()
        .map(Trip::from)
        .collect();

    Ok(Json(ListTripsResponse { trips }))
}

/// Stop a trip. Only the owner may do this.
///
/// POST /api/v1/trips/:trip_id/stop
pub async fn stop_trip(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<StopTripResponse>, ApiError> {
    let repo = TripRepository::new(state.pool.clone());
    let trip = repo
        .find_by_id(trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;

    if trip.owner_id != auth.user_id {
        return Err(ApiError::Forbidden("Only the trip owner can stop it".to_string()));
    }

    let stopped = repo.stop(trip_id, Utc::now()).await?;
    if !stopped {
        return Err(ApiError::Conflict("Trip is already stopped".to_string()));
    }

    info!(trip_id = %trip_id, "Trip stopped");
    Ok(Json(StopTripResponse { success: true }))
}
