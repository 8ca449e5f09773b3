//! Contact entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::ShareProgress;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the contacts table.
///
/// `progress` is stored as text; rows written by this crate always hold a
/// valid value, so an unparseable one maps back to the initial state.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub recipient_email: String,
    pub recipient_id: Option<Uuid>,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub destination_name: Option<String>,
    pub progress: String,
    pub eta_minutes: Option<i64>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ContactEntity {
    pub fn progress(&self) -> ShareProgress {
        self.progress.parse().unwrap_or(ShareProgress::Unsent)
    }
}

impl From<ContactEntity> for domain::models::Contact {
    fn from(entity: ContactEntity) -> Self {
        let progress = entity.progress();
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            recipient_email: entity.recipient_email,
            recipient_id: entity.recipient_id,
            destination_latitude: entity.destination_latitude,
            destination_longitude: entity.destination_longitude,
            destination_name: entity.destination_name,
            progress,
            eta_minutes: entity.eta_minutes,
            last_evaluated_at: entity.last_evaluated_at,
            active: entity.active,
            created_at: entity.created_at,
        }
    }
}

/// A contact aimed at the requesting user, joined with the owner's name.
#[derive(Debug, Clone, FromRow)]
pub struct IncomingShareEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub destination_name: Option<String>,
    pub progress: String,
    pub eta_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<IncomingShareEntity> for domain::models::contact::IncomingShare {
    fn from(entity: IncomingShareEntity) -> Self {
        let progress = entity.progress.parse().unwrap_or(ShareProgress::Unsent);
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            owner_name: entity.owner_name,
            destination_name: entity.destination_name,
            progress,
            eta_minutes: entity.eta_minutes,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_with_progress(progress: &str) -> ContactEntity {
        ContactEntity {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            recipient_email: "friend@example.com".to_string(),
            recipient_id: None,
            destination_latitude: 48.1486,
            destination_longitude: 17.1077,
            destination_name: None,
            progress: progress.to_string(),
            eta_minutes: None,
            last_evaluated_at: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_column_parses() {
        assert_eq!(entity_with_progress("near").progress(), ShareProgress::Near);
        assert_eq!(entity_with_progress("arrived").progress(), ShareProgress::Arrived);
    }

    #[test]
    fn test_unknown_progress_falls_back_to_unsent() {
        assert_eq!(entity_with_progress("corrupt").progress(), ShareProgress::Unsent);
    }
}
