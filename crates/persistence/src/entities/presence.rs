//! Presence entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the presence table.
#[derive(Debug, Clone, FromRow)]
pub struct PresenceEntity {
    pub user_id: Uuid,
    pub connection_type: String,
    pub last_seen: DateTime<Utc>,
}
