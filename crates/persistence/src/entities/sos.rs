//! SOS event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sos_events table.
#[derive(Debug, Clone, FromRow)]
pub struct SosEventEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub maps_link: String,
    pub recipients_notified: i32,
    pub created_at: DateTime<Utc>,
}

impl From<SosEventEntity> for domain::models::SosEvent {
    fn from(entity: SosEventEntity) -> Self {
        Self {
            id: entity.id,
            sender_id: entity.sender_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            maps_link: entity.maps_link,
            recipients_notified: entity.recipients_notified,
            created_at: entity.created_at,
        }
    }
}
