//! Circle domain model.
//!
//! A circle is a named group of users who share location with one another.
//! Members join via a short invite code generated at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Milliseconds after which a member's latest fix counts as stale.
pub const ACTIVE_THRESHOLD_MS: i64 = 300_000;

/// Represents a circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    /// Case-sensitive 6-character code used to join the circle.
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
}

/// A circle member as shown on the roster: profile joined with the
/// member's latest location for this circle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Latest fix is newer than the 5-minute staleness threshold.
    pub is_active: bool,
    /// Presence heartbeat seen within the last 60 seconds.
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i32>,
    pub is_charging: bool,
}

impl CircleMember {
    /// Derives the active flag from the latest fix timestamp.
    pub fn is_fix_fresh(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_updated {
            Some(ts) => (now - ts).num_milliseconds() < ACTIVE_THRESHOLD_MS,
            None => false,
        }
    }
}

/// Request payload for creating a circle.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCircleRequest {
    #[validate(length(min = 1, max = 100, message = "Circle name must be 1-100 characters"))]
    pub name: String,
}

/// Request payload for joining a circle by invite code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinCircleRequest {
    #[validate(length(equal = 6, message = "Invite code must be 6 characters"))]
    pub invite_code: String,
}

/// Response payload for circle operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleResponse {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub invite_code: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Response for listing a user's circles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCirclesResponse {
    pub circles: Vec<CircleResponse>,
}

/// Response for the roster endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub members: Vec<CircleMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_circle_request_validation() {
        let ok = CreateCircleRequest {
            name: "Family".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateCircleRequest {
            name: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_join_circle_request_code_length() {
        let ok = JoinCircleRequest {
            invite_code: "AB12CD".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = JoinCircleRequest {
            invite_code: "AB12".to_string(),
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_fix_freshness_within_threshold() {
        let now = Utc::now();
        let recent = now - chrono::Duration::minutes(4);
        assert!(CircleMember::is_fix_fresh(Some(recent), now));
    }

    #[test]
    fn test_fix_freshness_stale() {
        let now = Utc::now();
        let stale = now - chrono::Duration::minutes(6);
        assert!(!CircleMember::is_fix_fresh(Some(stale), now));
    }

    #[test]
    fn test_fix_freshness_boundary() {
        let now = Utc::now();
        // Exactly at the threshold is stale (strict less-than).
        let edge = now - chrono::Duration::milliseconds(ACTIVE_THRESHOLD_MS);
        assert!(!CircleMember::is_fix_fresh(Some(edge), now));
    }

    #[test]
    fn test_fix_freshness_no_fix() {
        assert!(!CircleMember::is_fix_fresh(None, Utc::now()));
    }

    #[test]
    fn test_roster_member_serialization() {
        let member = CircleMember {
            user_id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            latitude: Some(48.85),
            longitude: Some(2.35),
            last_updated: Some(Utc::now()),
            is_active: true,
            is_online: false,
            battery_level: Some(80),
            is_charging: false,
        };
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"isOnline\":false"));
        assert!(json.contains("\"batteryLevel\":80"));
    }
}
