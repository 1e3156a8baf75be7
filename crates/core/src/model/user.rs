use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// A registered account, stored in the `users` list.
///
/// Created once at registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub user_id: UserId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            user_id: UserId::generate(),
            created_at,
        }
    }
}

/// The "logged-in" marker. At most one exists per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub username: String,
    pub user_id: UserId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub login_time: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn new(username: impl Into<String>, login_time: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            user_id: UserId::generate(),
            login_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn user_record_uses_stored_field_names() {
        let user = UserRecord::new("alice", "alice@example.com", fixed_now());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert!(json["userId"].as_str().unwrap().starts_with("user_"));
    }

    #[test]
    fn session_record_reads_millisecond_login_time() {
        let raw = r#"{"username":"bob","userId":"user_abc123xyz","loginTime":1700000000000}"#;
        let session: SessionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(session.username, "bob");
        assert_eq!(session.user_id.as_str(), "user_abc123xyz");
        assert_eq!(session.login_time, fixed_now());
    }
}
