//! External service integrations and business services.

pub mod auth;
pub mod email;
pub mod fcm;

pub use auth::AuthService;
pub use email::{EmailMessage, EmailService};
pub use fcm::FcmPushService;

use std::sync::Arc;

use domain::services::{MockPushService, PushService};

use crate::config::Config;

/// Builds the push provider from configuration: FCM when enabled and
/// configured, the logging mock otherwise.
pub fn build_push_service(config: &Config) -> Arc<dyn PushService> {
    if config.fcm.enabled {
        match FcmPushService::new(config.fcm.clone()) {
            Ok(service) => return Arc::new(service),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize FCM, falling back to mock push");
            }
        }
    }
    Arc::new(MockPushService::new())
}
