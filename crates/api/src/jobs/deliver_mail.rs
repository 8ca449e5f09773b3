//! Mail queue delivery background job.

use persistence::repositories::MailRepository;
use sqlx::PgPool;
use tracing::{info, warn};

use super::scheduler::{Job, JobFrequency};
use crate::services::{EmailMessage, EmailService};

/// Drains the pending mail queue through the configured email provider.
pub struct DeliverMailJob {
    mail: MailRepository,
    email: EmailService,
    batch_size: i64,
}

impl DeliverMailJob {
    pub fn new(pool: PgPool, email: EmailService, batch_size: i64) -> Self {
        Self {
            mail: MailRepository::new(pool),
            email,
            batch_size,
        }
    }
}

#[async_trait::async_trait]
impl Job for DeliverMailJob {
    fn name(&self) -> &'static str {
        "deliver_mail"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(30)
    }

    async fn execute(&self) -> Result<(), String> {
        let pending = self
            .mail
            .fetch_pending(self.batch_size)
            .await
            .map_err(|e| format!("Failed to fetch pending mail: {}", e))?;

        if pending.is_empty() {
            return Ok(());
        }

        let mut sent = 0;
        let mut failed = 0;

        for entity in pending {
            let message = EmailMessage {
                to: entity.recipient_email.clone(),
                subject: entity.subject.clone(),
                body_html: entity.html_body.clone(),
            };

            match self.email.send(&message).await {
                Ok(()) => {
                    if let Err(e) = self.mail.mark_sent(entity.id).await {
                        warn!(error = %e, mail_id = %entity.id, "Failed to mark mail sent");
                    }
                    sent += 1;
                }
                Err(e) => {
                    if let Err(mark_err) = self.mail.mark_failed(entity.id, &e.to_string()).await {
                        warn!(error = %mark_err, mail_id = %entity.id, "Failed to mark mail failed");
                    }
                    failed += 1;
                }
            }
        }

        info!(sent, failed, "Mail delivery pass finished");
        Ok(())
    }
}
