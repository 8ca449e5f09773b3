//! Mail queue entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the mail_queue table.
#[derive(Debug, Clone, FromRow)]
pub struct MailEntity {
    pub id: Uuid,
    pub recipient_email: String,
    pub subject: String,
    pub html_body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}
