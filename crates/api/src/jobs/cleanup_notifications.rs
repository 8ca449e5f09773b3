//! Failed-notification cleanup background job.

use chrono::{Duration, Utc};
use persistence::repositories::NotificationRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Drops failed notifications once they are old enough that retrying or
/// surfacing them would be pointless.
pub struct CleanupNotificationsJob {
    notifications: NotificationRepository,
    retention_hours: i64,
}

impl CleanupNotificationsJob {
    pub fn new(pool: PgPool, retention_hours: i64) -> Self {
        Self {
            notifications: NotificationRepository::new(pool),
            retention_hours,
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupNotificationsJob {
    fn name(&self) -> &'static str {
        "cleanup_notifications"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - Duration::hours(self.retention_hours);
        let deleted = self
            .notifications
            .delete_failed_older_than(cutoff)
            .await
            .map_err(|e| format!("Failed to delete failed notifications: {}", e))?;

        if deleted > 0 {
            info!(deleted, "Cleaned up failed notifications");
        }
        Ok(())
    }
}
