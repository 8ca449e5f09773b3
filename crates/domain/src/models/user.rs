//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    /// SHA-256 hash of the normalized phone number, for contact matching.
    pub phone_hash: Option<String>,
    /// Push-messaging registration token, if the device registered one.
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user (no contact details beyond email).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            phone_number: u.phone_number,
            created_at: u.created_at,
        }
    }
}

/// Request payload for saving a push-messaging token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFcmTokenRequest {
    #[validate(length(min = 1, max = 512, message = "Token must be 1-512 characters"))]
    pub fcm_token: String,
}

/// Request payload for looking up users by phone number.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LookupUsersRequest {
    #[validate(length(min = 1, max = 100, message = "Provide 1-100 phone numbers"))]
    pub phone_numbers: Vec<String>,
}

/// Response payload for a phone-number lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUsersResponse {
    pub users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            phone_number: Some("+1 555 123 4567".to_string()),
            phone_hash: Some(shared::crypto::hash_phone_number("+1 555 123 4567")),
            fcm_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_from_user() {
        let user = test_user();
        let response: UserResponse = user.clone().into();
        assert_eq!(response.id, user.id);
        assert_eq!(response.email, user.email);
        assert_eq!(response.name, user.name);
    }

    #[test]
    fn test_user_response_hides_phone_when_absent() {
        let mut user = test_user();
        user.phone_number = None;
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("phoneNumber"));
    }

    #[test]
    fn test_update_fcm_token_request_validation() {
        let request = UpdateFcmTokenRequest {
            fcm_token: "fcm-token-abc".to_string(),
        };
        assert!(request.validate().is_ok());

        let empty = UpdateFcmTokenRequest {
            fcm_token: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_lookup_users_request_limits() {
        let ok = LookupUsersRequest {
            phone_numbers: vec!["5551234567".to_string()],
        };
        assert!(ok.validate().is_ok());

        let empty = LookupUsersRequest {
            phone_numbers: vec![],
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_user_serde_camel_case() {
        let json = serde_json::to_string(&test_user()).unwrap();
        assert!(json.contains("\"phoneNumber\""));
        assert!(json.contains("\"createdAt\""));
    }
}
