//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{NotificationKind, NotificationStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub status: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}

impl NotificationEntity {
    pub fn kind(&self) -> NotificationKind {
        NotificationKind::parse(&self.kind).unwrap_or(NotificationKind::CircleJoin)
    }

    pub fn status(&self) -> NotificationStatus {
        NotificationStatus::parse(&self.status).unwrap_or(NotificationStatus::Pending)
    }
}

impl From<NotificationEntity> for domain::models::Notification {
    fn from(entity: NotificationEntity) -> Self {
        let kind = entity.kind();
        let status = entity.status();
        Self {
            id: entity.id,
            recipient_id: entity.recipient_id,
            sender_id: entity.sender_id,
            kind,
            title: entity.title,
            body: entity.body,
            status,
            read: entity.read,
            created_at: entity.created_at,
            delivered_at: entity.delivered_at,
        }
    }
}
