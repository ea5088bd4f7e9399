//! Usage: Twitter v2 user models (wire envelope parsing + stored profile
//! form).

use crate::shared::error::NetworkError;
use serde::{Deserialize, Serialize};

// The v2 API hands back low-resolution `_normal` avatars; dropping the
// suffix yields the original upload.
const LOW_RES_IMAGE_SUFFIX: &str = "_normal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowMetrics {
    #[serde(rename = "followers_count")]
    pub followers: i64,
    #[serde(rename = "following_count")]
    pub following: i64,
}

/// The authenticated user's profile as consumed by the app and persisted
/// across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(rename = "public_metrics", default, skip_serializing_if = "Option::is_none")]
    pub follow_metrics: Option<FollowMetrics>,
}

/// Minimal user record as it appears in follow lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserList {
    pub users: Vec<UserSummary>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<UserSummary>,
}

impl User {
    /// Parse a `GET /2/users/me` style response (payload nested under
    /// `data`), upgrading the avatar URL to full resolution.
    pub(crate) fn from_response_body(body: &[u8]) -> Result<Self, NetworkError> {
        let envelope: DataEnvelope<User> = serde_json::from_slice(body).map_err(|err| {
            tracing::warn!("user response json invalid: {}", err);
            NetworkError::InvalidResponse
        })?;
        let mut user = envelope.data;
        user.profile_image_url = user
            .profile_image_url
            .map(|url| url.replace(LOW_RES_IMAGE_SUFFIX, ""));
        Ok(user)
    }
}

impl UserList {
    pub(crate) fn from_response_body(body: &[u8]) -> Result<Self, NetworkError> {
        let envelope: ListEnvelope = serde_json::from_slice(body).map_err(|err| {
            tracing::warn!("user list response json invalid: {}", err);
            NetworkError::InvalidResponse
        })?;
        Ok(Self {
            users: envelope.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_me_response_and_upgrades_avatar() {
        let body = serde_json::json!({
            "data": {
                "id": "12345",
                "name": "Jess Example",
                "username": "jess",
                "profile_image_url": "https://pbs.twimg.com/profile_images/1/photo_normal.jpg",
                "public_metrics": {"followers_count": 10, "following_count": 20}
            }
        })
        .to_string();

        let user = User::from_response_body(body.as_bytes()).expect("user");
        assert_eq!(user.id, "12345");
        assert_eq!(
            user.profile_image_url.as_deref(),
            Some("https://pbs.twimg.com/profile_images/1/photo.jpg")
        );
        let metrics = user.follow_metrics.expect("metrics");
        assert_eq!(metrics.followers, 10);
        assert_eq!(metrics.following, 20);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let body = serde_json::json!({
            "data": {"id": "1", "name": "N", "username": "n"}
        })
        .to_string();
        let user = User::from_response_body(body.as_bytes()).expect("user");
        assert!(user.profile_image_url.is_none());
        assert!(user.follow_metrics.is_none());
    }

    #[test]
    fn missing_envelope_is_invalid_response() {
        let body = serde_json::json!({"id": "1"}).to_string();
        assert_eq!(
            User::from_response_body(body.as_bytes()),
            Err(NetworkError::InvalidResponse)
        );
    }

    #[test]
    fn stored_profile_round_trips() {
        let user = User {
            id: "1".to_string(),
            name: "N".to_string(),
            username: "n".to_string(),
            profile_image_url: None,
            follow_metrics: None,
        };
        let encoded = serde_json::to_string(&user).expect("encode");
        let decoded: User = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, user);
    }

    #[test]
    fn parses_follow_list_and_tolerates_empty_data() {
        let body = serde_json::json!({
            "data": [
                {"id": "1", "name": "A", "username": "a"},
                {"id": "2", "name": "B", "username": "b"}
            ]
        })
        .to_string();
        let list = UserList::from_response_body(body.as_bytes()).expect("list");
        assert_eq!(list.users.len(), 2);

        let empty = serde_json::json!({"meta": {"result_count": 0}}).to_string();
        let list = UserList::from_response_body(empty.as_bytes()).expect("empty list");
        assert!(list.users.is_empty());
    }
}
