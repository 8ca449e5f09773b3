//! Location domain model.
//!
//! Each (user, circle) pair holds one current location row; every upload
//! overwrites the prior value. Location history is not kept beyond the
//! retention window enforced by the cleanup job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The current location of a user within one circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub user_id: Uuid,
    pub circle_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i32>,
    pub is_charging: bool,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for a device position fix.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadLocationRequest {
    /// Timestamp in milliseconds since epoch.
    #[validate(custom(function = "shared::validation::validate_timestamp"))]
    pub timestamp: i64,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    #[validate(custom(function = "shared::validation::validate_speed"))]
    pub speed: f64,

    #[validate(custom(function = "shared::validation::validate_accuracy"))]
    pub accuracy: f64,

    #[validate(custom(function = "shared::validation::validate_battery_level"))]
    pub battery_level: Option<i32>,

    #[serde(default)]
    pub is_charging: bool,
}

/// Response payload for a position-fix upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLocationResponse {
    pub success: bool,
    /// Number of circles the fix was fanned out to.
    pub circles_updated: usize,
    /// Number of arrival notifications dispatched by the contact check.
    pub notifications_dispatched: usize,
}

/// Latest known position for a user, independent of circle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastLocation {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> UploadLocationRequest {
        UploadLocationRequest {
            timestamp: Utc::now().timestamp_millis(),
            latitude: 37.7749,
            longitude: -122.4194,
            speed: 5.5,
            accuracy: 10.0,
            battery_level: Some(85),
            is_charging: false,
        }
    }

    #[test]
    fn test_upload_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_upload_request_invalid_latitude() {
        let mut request = valid_request();
        request.latitude = 100.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_request_invalid_longitude() {
        let mut request = valid_request();
        request.longitude = -200.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_request_negative_speed() {
        let mut request = valid_request();
        request.speed = -1.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_request_invalid_battery() {
        let mut request = valid_request();
        request.battery_level = Some(150);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_request_stale_timestamp() {
        let mut request = valid_request();
        request.timestamp = (Utc::now() - chrono::Duration::days(10)).timestamp_millis();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_request_deserialization_minimal() {
        let json = format!(
            r#"{{"timestamp":{},"latitude":45.0,"longitude":-120.0,"speed":0.0,"accuracy":12.5}}"#,
            Utc::now().timestamp_millis()
        );
        let request: UploadLocationRequest = serde_json::from_str(&json).unwrap();
        assert!(request.battery_level.is_none());
        assert!(!request.is_charging);
    }

    #[test]
    fn test_upload_response_serialization() {
        let response = UploadLocationResponse {
            success: true,
            circles_updated: 3,
            notifications_dispatched: 1,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"circlesUpdated\":3"));
        assert!(json.contains("\"notificationsDispatched\":1"));
    }
}
