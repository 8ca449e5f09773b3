//! Emergency SOS broadcast model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A recorded SOS broadcast and its fan-out outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosEvent {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub maps_link: String,
    pub recipients_notified: i32,
    pub created_at: DateTime<Utc>,
}

/// Builds the shareable maps link embedded in SOS notifications and mails.
pub fn maps_link(latitude: f64, longitude: f64) -> String {
    format!("https://maps.google.com/?q={latitude},{longitude}")
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendSosRequest {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSosResponse {
    pub success: bool,
    pub notifications_sent: i32,
    pub maps_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_link_format() {
        assert_eq!(
            maps_link(48.1486, 17.1077),
            "https://maps.google.com/?q=48.1486,17.1077"
        );
    }

    #[test]
    fn test_maps_link_negative_coordinates() {
        assert_eq!(
            maps_link(-33.8688, 151.2093),
            "https://maps.google.com/?q=-33.8688,151.2093"
        );
    }

    #[test]
    fn test_send_request_validation() {
        let request = SendSosRequest {
            latitude: 48.1486,
            longitude: 17.1077,
        };
        assert!(request.validate().is_ok());

        let request = SendSosRequest {
            latitude: 48.1486,
            longitude: 181.0,
        };
        assert!(request.validate().is_err());
    }
}
