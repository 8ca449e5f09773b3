//! Push-notification delivery background job.

use std::sync::Arc;

use domain::services::{PushMessage, PushResult, PushService};
use persistence::repositories::{NotificationRepository, UserRepository};
use sqlx::PgPool;
use tracing::{info, warn};

use super::scheduler::{Job, JobFrequency};

/// Drains the pending notification queue through the push provider.
///
/// Rows for recipients without a registered device token are marked
/// failed rather than retried; a token arriving later does not resurrect
/// old notifications.
pub struct DeliverNotificationsJob {
    notifications: NotificationRepository,
    users: UserRepository,
    push: Arc<dyn PushService>,
    batch_size: i64,
}

impl DeliverNotificationsJob {
    pub fn new(pool: PgPool, push: Arc<dyn PushService>, batch_size: i64) -> Self {
        Self {
            notifications: NotificationRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            push,
            batch_size,
        }
    }
}

#[async_trait::async_trait]
impl Job for DeliverNotificationsJob {
    fn name(&self) -> &'static str {
        "deliver_notifications"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        let pending = self
            .notifications
            .fetch_pending(self.batch_size)
            .await
            .map_err(|e| format!("Failed to fetch pending notifications: {}", e))?;

        if pending.is_empty() {
            return Ok(());
        }

        let mut sent = 0;
        let mut failed = 0;

        for entity in pending {
            let recipient = match self.users.find_by_id(entity.recipient_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    self.mark_failed(entity.id, "recipient no longer exists").await;
                    failed += 1;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, notification_id = %entity.id, "Failed to resolve recipient");
                    continue;
                }
            };

            let Some(fcm_token) = recipient.fcm_token.as_deref() else {
                self.mark_failed(entity.id, "no device token registered").await;
                failed += 1;
                continue;
            };

            let message = PushMessage {
                recipient_id: entity.recipient_id,
                kind: entity.kind(),
                title: entity.title.clone(),
                body: entity.body.clone(),
            };

            match self.push.send(fcm_token, &message).await {
                PushResult::Sent => {
                    if let Err(e) = self.notifications.mark_sent(entity.id).await {
                        warn!(error = %e, notification_id = %entity.id, "Failed to mark sent");
                    }
                    sent += 1;
                }
                PushResult::NoToken => {
                    self.mark_failed(entity.id, "device token rejected").await;
                    failed += 1;
                }
                PushResult::Failed(reason) => {
                    self.mark_failed(entity.id, &reason).await;
                    failed += 1;
                }
            }
        }

        info!(sent, failed, "Notification delivery pass finished");
        Ok(())
    }
}

impl DeliverNotificationsJob {
    async fn mark_failed(&self, id: uuid::Uuid, reason: &str) {
        if let Err(e) = self.notifications.mark_failed(id, reason).await {
            warn!(error = %e, notification_id = %id, "Failed to mark notification failed");
        }
    }
}
