//! Location retention background job.

use chrono::{Duration, Utc};
use persistence::repositories::LocationRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

/// Deletes location rows older than the retention window. Positions are
/// live state, not history, so anything this stale is just dead weight.
pub struct CleanupLocationsJob {
    locations: LocationRepository,
    retention_days: i64,
}

impl CleanupLocationsJob {
    pub fn new(pool: PgPool, retention_days: i64) -> Self {
        Self {
            locations: LocationRepository::new(pool),
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupLocationsJob {
    fn name(&self) -> &'static str {
        "cleanup_locations"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let deleted = self
            .locations
            .delete_older_than(cutoff)
            .await
            .map_err(|e| format!("Failed to delete stale locations: {}", e))?;

        info!(
            deleted,
            retention_days = self.retention_days,
            "Cleaned up stale locations"
        );
        Ok(())
    }
}
