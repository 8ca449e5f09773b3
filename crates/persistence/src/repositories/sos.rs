//! SOS event repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SosEventEntity;
use crate::metrics::QueryTimer;

/// Repository for SOS broadcast records.
#[derive(Clone)]
pub struct SosRepository {
    pool: PgPool,
}

impl SosRepository {
    /// Creates a new SosRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a broadcast and how many members it reached.
    pub async fn record(
        &self,
        sender_id: Uuid,
        latitude: f64,
        longitude: f64,
        maps_link: &str,
        recipients_notified: i32,
    ) -> Result<SosEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_sos_event");
        let result = sqlx::query_as::<_, SosEventEntity>(
            r#"
            INSERT INTO sos_events (sender_id, latitude, longitude, maps_link, recipients_notified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sender_id, latitude, longitude, maps_link, recipients_notified, created_at
            "#,
        )
        .bind(sender_id)
        .bind(latitude)
        .bind(longitude)
        .bind(maps_link)
        .bind(recipients_notified)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
