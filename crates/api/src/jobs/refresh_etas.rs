//! Trip ETA refresh background job.

use chrono::Utc;
use domain::services::{distance_meters, eta_minutes, ARRIVAL_RADIUS_M};
use persistence::repositories::{LocationRepository, TripRepository};
use sqlx::PgPool;
use tracing::{info, warn};

use super::scheduler::{Job, JobFrequency};

/// Recomputes distance and ETA for every active trip from the owner's
/// latest position, and auto-stops trips that have reached their
/// destination.
pub struct RefreshEtasJob {
    trips: TripRepository,
    locations: LocationRepository,
}

impl RefreshEtasJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            trips: TripRepository::new(pool.clone()),
            locations: LocationRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for RefreshEtasJob {
    fn name(&self) -> &'static str {
        "refresh_etas"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(60)
    }

    async fn execute(&self) -> Result<(), String> {
        let active = self
            .trips
            .list_active()
            .await
            .map_err(|e| format!("Failed to list active trips: {}", e))?;

        let mut refreshed = 0;
        let mut completed = 0;

        for trip in active {
            let Some(position) = self
                .locations
                .latest_for_user(trip.owner_id)
                .await
                .map_err(|e| format!("Failed to load owner position: {}", e))?
            else {
                // Owner has never reported a position; nothing to compute.
                continue;
            };

            let distance = distance_meters(
                position.latitude,
                position.longitude,
                trip.destination_latitude,
                trip.destination_longitude,
            );

            if distance <= ARRIVAL_RADIUS_M {
                match self.trips.stop(trip.id, Utc::now()).await {
                    Ok(true) => {
                        completed += 1;
                        info!(trip_id = %trip.id, "Trip reached destination, auto-stopped");
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, trip_id = %trip.id, "Failed to auto-stop trip");
                    }
                }
                continue;
            }

            let eta = eta_minutes(distance, position.speed);
            self.trips
                .update_estimate(trip.id, eta, distance)
                .await
                .map_err(|e| format!("Failed to update trip estimate: {}", e))?;
            refreshed += 1;
        }

        if refreshed > 0 || completed > 0 {
            info!(refreshed, completed, "Refreshed trip estimates");
        }
        Ok(())
    }
}
