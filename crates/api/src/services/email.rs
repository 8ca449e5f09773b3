//! Outbound email delivery.
//!
//! Supports a console provider for development (logs the message) and
//! SendGrid for production delivery.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::config::EmailConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// An email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),

    #[error("SendGrid API key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Email API error: {0}")]
    ApiError(String),
}

/// Email delivery service.
pub struct EmailService {
    client: Client,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Send an email through the configured provider.
    ///
    /// When email delivery is disabled, messages are dropped silently so
    /// callers do not need to special-case development environments.
    pub async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            tracing::debug!(to = %message.to, "Email delivery disabled, dropping message");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    body = %message.body_html,
                    "Console email"
                );
                Ok(())
            }
            "sendgrid" => self.send_via_sendgrid(message).await,
            other => Err(EmailError::UnknownProvider(other.to_string())),
        }
    }

    async fn send_via_sendgrid(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::MissingApiKey);
        }
        let api_key = &self.config.sendgrid_api_key;

        let body = json!({
            "personalizations": [{
                "to": [{ "email": message.to }],
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name,
            },
            "subject": message.subject,
            "content": [{
                "type": "text/html",
                "value": message.body_html,
            }],
        });

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmailError::ApiError(error_text));
        }

        tracing::info!(to = %message.to, "Email sent via SendGrid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console_config(enabled: bool) -> EmailConfig {
        EmailConfig {
            enabled,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "noreply@ontheway.app".to_string(),
            sender_name: "OnTheWay".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_email_is_silently_dropped() {
        let service = EmailService::new(console_config(false));
        let message = EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            body_html: "<p>Hi</p>".to_string(),
        };
        assert!(service.send(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_console_provider_succeeds() {
        let service = EmailService::new(console_config(true));
        let message = EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            body_html: "<p>Hi</p>".to_string(),
        };
        assert!(service.send(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let mut config = console_config(true);
        config.provider = "pigeon".to_string();
        let service = EmailService::new(config);
        let message = EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            body_html: "<p>Hi</p>".to_string(),
        };
        assert!(matches!(
            service.send(&message).await,
            Err(EmailError::UnknownProvider(_))
        ));
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_fails() {
        let mut config = console_config(true);
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config);
        let message = EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            body_html: "<p>Hi</p>".to_string(),
        };
        assert!(matches!(
            service.send(&message).await,
            Err(EmailError::MissingApiKey)
        ));
    }
}
