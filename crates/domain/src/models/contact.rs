//! Arrival contacts and the share-progress state machine.
//!
//! A contact is a directed share: the owner tells one recipient where they
//! are headed, and the recipient gets a countdown plus at most one "almost
//! there" and one "arrived" notification. Progress only ever moves forward,
//! so a retried evaluation can never fire the same notification twice.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How far a share has progressed toward its destination.
///
/// Transitions are monotonic: `Unsent -> Near -> Arrived`, with the `Near`
/// step skipped when the owner starts inside the arrival radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareProgress {
    Unsent,
    Near,
    Arrived,
}

impl ShareProgress {
    /// Returns the later of the two states. Used when applying an evaluated
    /// transition so a stale evaluation can never move progress backwards.
    pub fn advance_to(self, next: ShareProgress) -> ShareProgress {
        self.max(next)
    }
}

impl fmt::Display for ShareProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShareProgress::Unsent => "unsent",
            ShareProgress::Near => "near",
            ShareProgress::Arrived => "arrived",
        };
        f.write_str(s)
    }
}

impl FromStr for ShareProgress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsent" => Ok(ShareProgress::Unsent),
            "near" => Ok(ShareProgress::Near),
            "arrived" => Ok(ShareProgress::Arrived),
            other => Err(format!("unknown share progress: {other}")),
        }
    }
}

/// A directed location share from an owner to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub recipient_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Uuid>,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    pub progress: ShareProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[validate(email(message = "Invalid email address"))]
    pub recipient_email: String,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub destination_latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub destination_longitude: f64,

    #[validate(length(max = 200, message = "Destination name too long"))]
    pub destination_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsResponse {
    pub contacts: Vec<Contact>,
}

/// A share aimed at the requesting user, as seen by the recipient.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingShare {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    pub progress: ShareProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ordering() {
        assert!(ShareProgress::Unsent < ShareProgress::Near);
        assert!(ShareProgress::Near < ShareProgress::Arrived);
    }

    #[test]
    fn test_progress_never_regresses() {
        assert_eq!(
            ShareProgress::Arrived.advance_to(ShareProgress::Near),
            ShareProgress::Arrived
        );
        assert_eq!(
            ShareProgress::Near.advance_to(ShareProgress::Unsent),
            ShareProgress::Near
        );
        assert_eq!(
            ShareProgress::Unsent.advance_to(ShareProgress::Arrived),
            ShareProgress::Arrived
        );
    }

    #[test]
    fn test_progress_display_roundtrip() {
        for progress in [ShareProgress::Unsent, ShareProgress::Near, ShareProgress::Arrived] {
            let text = progress.to_string();
            assert_eq!(text.parse::<ShareProgress>().unwrap(), progress);
        }
    }

    #[test]
    fn test_progress_parse_unknown() {
        assert!("done".parse::<ShareProgress>().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateContactRequest {
            recipient_email: "friend@example.com".to_string(),
            destination_latitude: 48.1486,
            destination_longitude: 17.1077,
            destination_name: Some("Home".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = CreateContactRequest {
            recipient_email: "not-an-email".to_string(),
            destination_latitude: 48.1486,
            destination_longitude: 17.1077,
            destination_name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_progress_serde_snake_case() {
        let json = serde_json::to_string(&ShareProgress::Near).unwrap();
        assert_eq!(json, "\"near\"");
        let parsed: ShareProgress = serde_json::from_str("\"arrived\"").unwrap();
        assert_eq!(parsed, ShareProgress::Arrived);
    }
}
