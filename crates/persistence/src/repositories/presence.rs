//! Presence repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PresenceEntity;
use crate::metrics::QueryTimer;

/// Repository for heartbeat records.
#[derive(Clone)]
pub struct PresenceRepository {
    pool: PgPool,
}

impl PresenceRepository {
    /// Creates a new PresenceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a heartbeat, replacing the previous one.
    pub async fn heartbeat(&self, user_id: Uuid, connection_type: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("presence_heartbeat");
        let result = sqlx::query(
            r#"
            INSERT INTO presence (user_id, connection_type, last_seen)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE SET
                connection_type = EXCLUDED.connection_type,
                last_seen = now()
            "#,
        )
        .bind(user_id)
        .bind(connection_type)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Heartbeats for every member of a circle. Members who never
    /// heartbeat have no row.
    pub async fn for_circle(&self, circle_id: Uuid) -> Result<Vec<PresenceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("presence_for_circle");
        let result = sqlx::query_as::<_, PresenceEntity>(
            r#"
            SELECT p.user_id, p.connection_type, p.last_seen
            FROM presence p
            JOIN circle_memberships cm ON cm.user_id = p.user_id
            WHERE cm.circle_id = $1
            "#,
        )
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
