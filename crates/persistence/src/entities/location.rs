//! Location entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the locations table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationEntity {
    pub user_id: Uuid,
    pub circle_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub accuracy: f64,
    pub battery_level: Option<i32>,
    pub is_charging: bool,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<LocationEntity> for domain::models::LocationUpdate {
    fn from(entity: LocationEntity) -> Self {
        Self {
            user_id: entity.user_id,
            circle_id: entity.circle_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            speed: entity.speed,
            accuracy: entity.accuracy,
            battery_level: entity.battery_level,
            is_charging: entity.is_charging,
            captured_at: entity.captured_at,
            created_at: entity.created_at,
        }
    }
}

/// A user's most recent fix across all their circles.
#[derive(Debug, Clone, FromRow)]
pub struct LatestLocationEntity {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub captured_at: DateTime<Utc>,
}
