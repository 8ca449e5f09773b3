//! Mail queue repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MailEntity;
use crate::metrics::QueryTimer;

const MAIL_COLUMNS: &str = "id, recipient_email, subject, html_body, status, \
     created_at, sent_at, failed_at, failure_reason";

/// Repository for the outbound mail queue.
#[derive(Clone)]
pub struct MailRepository {
    pool: PgPool,
}

impl MailRepository {
    /// Creates a new MailRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Queue a mail for delivery.
    pub async fn enqueue(
        &self,
        recipient_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<MailEntity, sqlx::Error> {
        let timer = QueryTimer::new("enqueue_mail");
        let result = sqlx::query_as::<_, MailEntity>(&format!(
            r#"
            INSERT INTO mail_queue (recipient_email, subject, html_body)
            VALUES ($1, $2, $3)
            RETURNING {MAIL_COLUMNS}
            "#,
        ))
        .bind(recipient_email)
        .bind(subject)
        .bind(html_body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Oldest pending mails, for the delivery job.
    pub async fn fetch_pending(&self, limit: i64) -> Result<Vec<MailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("fetch_pending_mail");
        let result = sqlx::query_as::<_, MailEntity>(&format!(
            r#"
            SELECT {MAIL_COLUMNS} FROM mail_queue
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

    /// Mark a mail delivered.
    pub async fn mark_sent(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_mail_sent");
        let result = sqlx::query(
            "UPDATE mail_queue SET status = 'sent', sent_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Mark a mail failed, keeping the reason for triage.
    pub async fn mark_failed(&self, id: Uuid, reason: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_mail_failed");
        let result = sqlx::query(
            r#"
            UPDATE mail_queue
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
}
