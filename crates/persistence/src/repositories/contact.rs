//! Contact repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::ShareProgress;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ContactEntity, IncomingShareEntity};
use crate::metrics::QueryTimer;

const CONTACT_COLUMNS: &str = "id, owner_id, recipient_email, recipient_id, \
     destination_latitude, destination_longitude, destination_name, \
     progress, eta_minutes, last_evaluated_at, active, created_at";

/// Repository for arrival-contact database operations.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Creates a new ContactRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a share toward one recipient. Re-adding the same recipient
    /// replaces the destination and resets progress.
    pub async fn create(
        &self,
        owner_id: Uuid,
        recipient_email: &str,
        recipient_id: Option<Uuid>,
        destination_latitude: f64,
        destination_longitude: f64,
        destination_name: Option<&str>,
    ) -> Result<ContactEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_contact");
        let result = sqlx::query_as::<_, ContactEntity>(&format!(
            r#"
            INSERT INTO contacts
                (owner_id, recipient_email, recipient_id,
                 destination_latitude, destination_longitude, destination_name)
            VALUES ($1, lower($2), $3, $4, $5, $6)
            ON CONFLICT (owner_id, recipient_email) DO UPDATE SET
                recipient_id = EXCLUDED.recipient_id,
                destination_latitude = EXCLUDED.destination_latitude,
                destination_longitude = EXCLUDED.destination_longitude,
                destination_name = EXCLUDED.destination_name,
                progress = 'unsent',
                eta_minutes = NULL,
                last_evaluated_at = NULL,
                active = true,
                created_at = now()
            RETURNING {CONTACT_COLUMNS}
            "#,
        ))
        .bind(owner_id)
        .bind(recipient_email)
        .bind(recipient_id)
        .bind(destination_latitude)
        .bind(destination_longitude)
        .bind(destination_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a share by owner and recipient email.
    pub async fn delete_by_recipient_email(
        &self,
        owner_id: Uuid,
        recipient_email: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_contact");
        let result = sqlx::query(
            "DELETE FROM contacts WHERE owner_id = $1 AND recipient_email = lower($2)",
        )
        .bind(owner_id)
        .bind(recipient_email)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// All shares created by the owner, newest first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_contacts_by_owner");
        let result = sqlx::query_as::<_, ContactEntity>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = $1 ORDER BY created_at DESC",
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active shares created by the owner, for arrival evaluation.
    pub async fn list_active_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<ContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_contacts");
        let result = sqlx::query_as::<_, ContactEntity>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = $1 AND active",
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Shares aimed at the given user, joined with the owner's name.
    /// Matches on recipient id when linked, else on email.
    pub async fn list_incoming(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<IncomingShareEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_incoming_shares");
        let result = sqlx::query_as::<_, IncomingShareEntity>(
            r#"
            SELECT
                c.id, c.owner_id, u.name AS owner_name,
                c.destination_name, c.progress, c.eta_minutes, c.created_at
            FROM contacts c
            JOIN users u ON u.id = c.owner_id
            WHERE c.active
              AND (c.recipient_id = $1 OR c.recipient_email = lower($2))
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist the outcome of one arrival evaluation.
    ///
    /// The CASE guard keeps progress monotonic even if two fixes are
    /// evaluated concurrently.
    pub async fn record_evaluation(
        &self,
        contact_id: Uuid,
        progress: ShareProgress,
        eta_minutes: i64,
        evaluated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_contact_evaluation");
        let result = sqlx::query(
            r#"
            UPDATE contacts SET
                progress = CASE
                    WHEN progress = 'arrived' THEN 'arrived'
                    WHEN progress = 'near' AND $2 = 'unsent' THEN 'near'
                    ELSE $2
                END,
                eta_minutes = $3,
                last_evaluated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(contact_id)
        .bind(progress.to_string())
        .bind(eta_minutes)
        .bind(evaluated_at)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Link shares addressed to an email to a freshly registered user.
    pub async fn link_recipient(&self, user_id: Uuid, email: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("link_contact_recipient");
        let result = sqlx::query(
            r#"
            UPDATE contacts SET recipient_id = $1
            WHERE recipient_id IS NULL AND recipient_email = lower($2)
            "#,
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
