//! In-app notification model and message templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What triggered a notification. Stored as the snake_case wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// ETA dropped to two minutes or less.
    #[serde(rename = "2_minutes")]
    TwoMinutes,
    /// Share owner reached their destination.
    Arrived,
    /// User left a watched location.
    Left,
    /// User entered a watched location.
    Entered,
    /// Emergency broadcast from a circle member.
    Sos,
    /// Someone joined one of the recipient's circles.
    CircleJoin,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TwoMinutes => "2_minutes",
            NotificationKind::Arrived => "arrived",
            NotificationKind::Left => "left",
            NotificationKind::Entered => "entered",
            NotificationKind::Sos => "sos",
            NotificationKind::CircleJoin => "circle_join",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationKind> {
        match s {
            "2_minutes" => Some(NotificationKind::TwoMinutes),
            "arrived" => Some(NotificationKind::Arrived),
            "left" => Some(NotificationKind::Left),
            "entered" => Some(NotificationKind::Entered),
            "sos" => Some(NotificationKind::Sos),
            "circle_join" => Some(NotificationKind::CircleJoin),
            _ => None,
        }
    }

    /// Push title for this kind. `context` is the sender name where the
    /// title needs one (SOS and circle joins).
    pub fn title(&self, context: &str) -> String {
        match self {
            NotificationKind::TwoMinutes => "Almost There! 🚗".to_string(),
            NotificationKind::Arrived => "Arrived! 📍".to_string(),
            NotificationKind::Left => "Left Location".to_string(),
            NotificationKind::Entered => "Entered Location".to_string(),
            NotificationKind::Sos => "🚨 EMERGENCY SOS".to_string(),
            NotificationKind::CircleJoin => format!("New Member in {context}"),
        }
    }

    /// Push body for this kind. `eta_minutes` is only read for the
    /// two-minute warning; `detail` carries the maps link for SOS and the
    /// joiner names for circle joins.
    pub fn body(&self, from: &str, eta_minutes: i64, detail: &str) -> String {
        match self {
            NotificationKind::TwoMinutes => {
                format!("{from} is 2 minutes away (ETA: {eta_minutes} min)")
            }
            NotificationKind::Arrived => format!("{from} has arrived at the destination"),
            NotificationKind::Left => format!("{from} has left the location"),
            NotificationKind::Entered => format!("{from} has entered the location"),
            NotificationKind::Sos => {
                format!("{from} has sent an SOS! Last known location: {detail}")
            }
            NotificationKind::CircleJoin => format!("{detail} joined the circle"),
        }
    }
}

/// Delivery state of a queued notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationStatus> {
        match s {
            "pending" => Some(NotificationStatus::Pending),
            "sent" => Some(NotificationStatus::Sent),
            "failed" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }
}

/// A queued or delivered in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub status: NotificationStatus,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Cursor-paginated notification listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_roundtrip() {
        for kind in [
            NotificationKind::TwoMinutes,
            NotificationKind::Arrived,
            NotificationKind::Left,
            NotificationKind::Entered,
            NotificationKind::Sos,
            NotificationKind::CircleJoin,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("bogus"), None);
    }

    #[test]
    fn test_two_minute_body_includes_eta() {
        let body = NotificationKind::TwoMinutes.body("Alice", 2, "");
        assert_eq!(body, "Alice is 2 minutes away (ETA: 2 min)");
    }

    #[test]
    fn test_arrived_body() {
        let body = NotificationKind::Arrived.body("Bob", 0, "");
        assert_eq!(body, "Bob has arrived at the destination");
    }

    #[test]
    fn test_sos_body_carries_maps_link() {
        let link = "https://maps.google.com/?q=48.1486,17.1077";
        let body = NotificationKind::Sos.body("Carol", 0, link);
        assert!(body.contains("Carol has sent an SOS!"));
        assert!(body.ends_with(link));
    }

    #[test]
    fn test_circle_join_title_names_circle() {
        assert_eq!(NotificationKind::CircleJoin.title("Family"), "New Member in Family");
    }

    #[test]
    fn test_status_wire_roundtrip() {
        for status in [
            NotificationStatus::Pending,
            NotificationStatus::Sent,
            NotificationStatus::Failed,
        ] {
            assert_eq!(NotificationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_kind_serde_matches_wire_format() {
        let json = serde_json::to_string(&NotificationKind::CircleJoin).unwrap();
        assert_eq!(json, "\"circle_join\"");
        let json = serde_json::to_string(&NotificationKind::TwoMinutes).unwrap();
        assert_eq!(json, "\"2_minutes\"");
    }
}
