//! Circle entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the circles table.
#[derive(Debug, Clone, FromRow)]
pub struct CircleEntity {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<CircleEntity> for domain::models::Circle {
    fn from(entity: CircleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_by: entity.created_by,
            invite_code: entity.invite_code,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the circle_memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct CircleMembershipEntity {
    pub circle_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// A circle joined with its membership count, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct CircleWithCountEntity {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
}

/// One roster row: member profile joined with their location in the
/// circle and their presence heartbeat. All location and presence columns
/// are null when the member has never uploaded or heartbeat.
#[derive(Debug, Clone, FromRow)]
pub struct RosterMemberEntity {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_at: Option<DateTime<Utc>>,
    pub battery_level: Option<i32>,
    pub is_charging: Option<bool>,
    pub connection_type: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}
