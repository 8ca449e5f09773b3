//! Trips: a destination shared with a circle, with a live ETA.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An active or completed journey toward a destination, visible to a
/// circle. An empty `shared_with` list means the whole circle can see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub circle_id: Uuid,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    pub shared_with: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    pub active: bool,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Whether `user_id` may see this trip. Owners always can; otherwise
    /// an empty share list opens the trip to every circle member.
    pub fn visible_to(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
            || self.shared_with.is_empty()
            || self.shared_with.contains(&user_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartTripRequest {
    pub circle_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub destination_latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub destination_longitude: f64,

    #[validate(length(max = 200, message = "Destination name too long"))]
    pub destination_name: Option<String>,

    /// Member ids to restrict visibility to. Empty means the whole circle.
    #[serde(default)]
    pub shared_with: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsResponse {
    pub trips: Vec<Trip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(owner: Uuid, shared_with: Vec<Uuid>) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            owner_id: owner,
            circle_id: Uuid::new_v4(),
            destination_latitude: 48.1486,
            destination_longitude: 17.1077,
            destination_name: Some("Office".to_string()),
            shared_with,
            eta_minutes: Some(12),
            distance_meters: Some(9500.0),
            active: true,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn test_empty_share_list_means_whole_circle() {
        let viewer = Uuid::new_v4();
        assert!(trip(Uuid::new_v4(), vec![]).visible_to(viewer));
    }

    #[test]
    fn test_restricted_trip_hidden_from_outsiders() {
        let insider = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let t = trip(Uuid::new_v4(), vec![insider]);
        assert!(t.visible_to(insider));
        assert!(!t.visible_to(outsider));
    }

    #[test]
    fn test_owner_always_sees_own_trip() {
        let owner = Uuid::new_v4();
        let t = trip(owner, vec![Uuid::new_v4()]);
        assert!(t.visible_to(owner));
    }

    #[test]
    fn test_start_request_validation() {
        let request = StartTripRequest {
            circle_id: Uuid::new_v4(),
            destination_latitude: 91.0,
            destination_longitude: 17.1077,
            destination_name: None,
            shared_with: vec![],
        };
        assert!(request.validate().is_err());
    }
}
