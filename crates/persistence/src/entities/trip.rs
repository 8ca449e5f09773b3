//! Trip entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the trips table.
#[derive(Debug, Clone, FromRow)]
pub struct TripEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub circle_id: Uuid,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub destination_name: Option<String>,
    pub shared_with: Vec<Uuid>,
    pub eta_minutes: Option<i64>,
    pub distance_meters: Option<f64>,
    pub active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<TripEntity> for domain::models::Trip {
    fn from(entity: TripEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            circle_id: entity.circle_id,
            destination_latitude: entity.destination_latitude,
            destination_longitude: entity.destination_longitude,
            destination_name: entity.destination_name,
            shared_with: entity.shared_with,
            eta_minutes: entity.eta_minutes,
            distance_meters: entity.distance_meters,
            active: entity.active,
            started_at: entity.started_at,
            ended_at: entity.ended_at,
        }
    }
}
