//! Push delivery abstraction.
//!
//! The API crate provides an FCM-backed implementation; tests and local
//! development use the mock, which only logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::NotificationKind;

/// A rendered push message bound for one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

/// Result of a push send attempt.
#[derive(Debug, Clone)]
pub enum PushResult {
    /// Message was accepted by the push provider.
    Sent,
    /// Recipient has no FCM token registered.
    NoToken,
    /// Sending failed; delivery is retried by the queue job.
    Failed(String),
}

/// Push service trait for delivering notifications to devices.
#[async_trait::async_trait]
pub trait PushService: Send + Sync {
    /// Send a message to the device identified by `fcm_token`.
    async fn send(&self, fcm_token: &str, message: &PushMessage) -> PushResult;
}

/// Mock push service for development and testing.
///
/// Logs messages but doesn't actually send them.
#[derive(Debug, Clone, Default)]
pub struct MockPushService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockPushService {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl PushService for MockPushService {
    async fn send(&self, fcm_token: &str, message: &PushMessage) -> PushResult {
        if self.simulate_failure {
            tracing::warn!(
                fcm_token = %fcm_token,
                recipient_id = %message.recipient_id,
                "Mock push service simulating failure"
            );
            return PushResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            fcm_token = %fcm_token,
            recipient_id = %message.recipient_id,
            kind = %message.kind.as_str(),
            title = %message.title,
            "Mock: Would send push notification"
        );

        PushResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> PushMessage {
        PushMessage {
            recipient_id: Uuid::new_v4(),
            kind: NotificationKind::Arrived,
            title: "Arrived! 📍".to_string(),
            body: "Alice has arrived at the destination".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_sends() {
        let service = MockPushService::new();
        assert!(matches!(service.send("token", &message()).await, PushResult::Sent));
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let service = MockPushService::failing();
        assert!(matches!(
            service.send("token", &message()).await,
            PushResult::Failed(_)
        ));
    }
}
