//! Notification repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::NotificationKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, sender_id, kind, title, body, \
     status, read, created_at, delivered_at, failed_at, failure_reason";

/// Repository for notification-queue database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Queue a notification for delivery.
    pub async fn enqueue(
        &self,
        recipient_id: Uuid,
        sender_id: Option<Uuid>,
        kind: NotificationKind,
        title: &str,
        body: &str,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("enqueue_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            INSERT INTO notifications (recipient_id, sender_id, kind, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTIFICATION_COLUMNS}
            "#,
        ))
        .bind(recipient_id)
        .bind(sender_id)
        .bind(kind.as_str())
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// One page of a recipient's notifications, newest first. The cursor
    /// is the (created_at, id) of the last row of the previous page.
    pub async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications");
        let result = if let Some((created_at, id)) = before {
            sqlx::query_as::<_, NotificationEntity>(&format!(
                r#"
                SELECT {NOTIFICATION_COLUMNS} FROM notifications
                WHERE recipient_id = $1 AND (created_at, id) < ($2, $3)
                ORDER BY created_at DESC, id DESC
                LIMIT $4
                "#,
            ))
            .bind(recipient_id)
            .bind(created_at)
            .bind(id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, NotificationEntity>(&format!(
                r#"
                SELECT {NOTIFICATION_COLUMNS} FROM notifications
                WHERE recipient_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                "#,
            ))
            .bind(recipient_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        };
        timer.record();
        result
    }

    /// Oldest pending notifications, for the delivery job.
    pub async fn fetch_pending(&self, limit: i64) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("fetch_pending_notifications");
        let result = sqlx::query_as::<_, NotificationEntity>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE status = 'pending'
            ORDER BY created_at
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a notification delivered.
    pub async fn mark_sent(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_sent");
        let result = sqlx::query(
            "UPDATE notifications SET status = 'sent', delivered_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Mark a notification failed, keeping the reason for triage.
    pub async fn mark_failed(&self, id: Uuid, reason: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_failed");
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = 'failed', failed_at = now(), failure_reason = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(reason)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Drop failed notifications older than the cutoff.
    pub async fn delete_failed_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_failed_notifications");
        let result = sqlx::query(
            "DELETE FROM notifications WHERE status = 'failed' AND failed_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
