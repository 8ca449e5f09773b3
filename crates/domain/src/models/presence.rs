//! Online presence derived from heartbeats.
//!
//! Clients heartbeat every 30 seconds; a user is online while their last
//! heartbeat is under a minute old. Missing two heartbeats in a row flips
//! them offline without any explicit sign-off.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Heartbeats older than this mark the user offline.
pub const ONLINE_THRESHOLD_SECS: i64 = 60;

/// Expected client heartbeat interval.
pub const HEARTBEAT_INTERVAL_SECS: i64 = 30;

/// How the client was connected when it last heartbeat. `Offline` is an
/// explicit sign-off sent before the app backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Wifi,
    Cellular,
    Active,
    Offline,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Cellular => "cellular",
            ConnectionType::Active => "active",
            ConnectionType::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<ConnectionType> {
        match s {
            "wifi" => Some(ConnectionType::Wifi),
            "cellular" => Some(ConnectionType::Cellular),
            "active" => Some(ConnectionType::Active),
            "offline" => Some(ConnectionType::Offline),
            _ => None,
        }
    }
}

impl Default for ConnectionType {
    fn default() -> Self {
        ConnectionType::Active
    }
}

/// Heartbeat request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub connection_type: ConnectionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub user_id: Uuid,
    pub is_online: bool,
    pub connection_type: ConnectionType,
    pub last_seen: DateTime<Utc>,
}

impl Presence {
    /// Whether a heartbeat at `last_seen` still counts as online at `now`.
    pub fn is_heartbeat_fresh(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(last_seen) < Duration::seconds(ONLINE_THRESHOLD_SECS)
    }

    /// Online means a fresh heartbeat that was not an explicit sign-off.
    pub fn is_online(
        connection_type: ConnectionType,
        last_seen: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        connection_type != ConnectionType::Offline && Self::is_heartbeat_fresh(last_seen, now)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CirclePresenceResponse {
    pub members: Vec<Presence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_heartbeat_is_online() {
        let now = Utc::now();
        let last_seen = now - Duration::seconds(30);
        assert!(Presence::is_heartbeat_fresh(last_seen, now));
    }

    #[test]
    fn test_stale_heartbeat_is_offline() {
        let now = Utc::now();
        let last_seen = now - Duration::seconds(90);
        assert!(!Presence::is_heartbeat_fresh(last_seen, now));
    }

    #[test]
    fn test_threshold_boundary_is_offline() {
        let now = Utc::now();
        let last_seen = now - Duration::seconds(ONLINE_THRESHOLD_SECS);
        assert!(!Presence::is_heartbeat_fresh(last_seen, now));
    }

    #[test]
    fn test_two_missed_heartbeats_cross_threshold() {
        assert!(2 * HEARTBEAT_INTERVAL_SECS >= ONLINE_THRESHOLD_SECS);
    }

    #[test]
    fn test_explicit_offline_beats_freshness() {
        let now = Utc::now();
        assert!(!Presence::is_online(ConnectionType::Offline, now, now));
        assert!(Presence::is_online(ConnectionType::Wifi, now, now));
    }

    #[test]
    fn test_connection_type_wire_roundtrip() {
        for ct in [
            ConnectionType::Wifi,
            ConnectionType::Cellular,
            ConnectionType::Active,
            ConnectionType::Offline,
        ] {
            assert_eq!(ConnectionType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(ConnectionType::parse("carrier_pigeon"), None);
    }

    #[test]
    fn test_heartbeat_request_defaults_to_active() {
        let request: HeartbeatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.connection_type, ConnectionType::Active);
    }
}
