//! Typed access to the three persisted records.
//!
//! Unparseable JSON is treated exactly like a missing value: readers get
//! `None` (or an empty list) and a warning is logged. Only backend failures
//! surface as errors. Entries of a parseable user list that do not fit
//! `UserRecord` are kept as written.

use std::sync::Arc;

use cbt_core::model::{ProgressRecord, SessionRecord, UserRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::repository::{KeyValueStore, StorageError};

pub const USERS_KEY: &str = "users";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const PROGRESS_KEY: &str = "userProgress";

/// The `users` list as stored, including entries that do not decode as
/// `UserRecord`. Saving it back writes those entries unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredUsers {
    entries: Vec<Value>,
}

impl StoredUsers {
    /// Entries that decode as `UserRecord`, in stored order.
    #[must_use]
    pub fn records(&self) -> Vec<UserRecord> {
        self.entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect()
    }

    /// Matches the `username` field of any entry, decodable or not.
    #[must_use]
    pub fn has_username(&self, username: &str) -> bool {
        self.any_field("username", username)
    }

    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.any_field("email", email)
    }

    fn any_field(&self, field: &str, value: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.get(field).and_then(Value::as_str) == Some(value))
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the record cannot be encoded.
    pub fn push(&mut self, user: &UserRecord) -> Result<(), StorageError> {
        let entry =
            serde_json::to_value(user).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone)]
pub struct LocalRecords {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalRecords {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Registered users that decode cleanly; a corrupt list reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn users(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(self.stored_users().await?.records())
    }

    /// The raw user list for read-modify-write. Only a value that is not a
    /// JSON array reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn stored_users(&self) -> Result<StoredUsers, StorageError> {
        let entries: Vec<Value> = self.read(USERS_KEY).await?.unwrap_or_default();
        let users = StoredUsers { entries };
        let skipped = users.len() - users.records().len();
        if skipped > 0 {
            tracing::warn!(skipped, "stored users that do not fit the record schema are kept as-is");
        }
        Ok(users)
    }

    /// # Errors
    ///
    /// Returns `StorageError` on serialization or backend failures.
    pub async fn save_users(&self, users: &StoredUsers) -> Result<(), StorageError> {
        self.write(USERS_KEY, &users.entries).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn current_user(&self) -> Result<Option<SessionRecord>, StorageError> {
        self.read(CURRENT_USER_KEY).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on serialization or backend failures.
    pub async fn set_current_user(&self, session: &SessionRecord) -> Result<(), StorageError> {
        self.write(CURRENT_USER_KEY, session).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear_current_user(&self) -> Result<(), StorageError> {
        self.kv.remove(CURRENT_USER_KEY).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        self.read(PROGRESS_KEY).await
    }

    /// Whether any value (parseable or not) is stored under the progress key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn has_progress(&self) -> Result<bool, StorageError> {
        Ok(self.kv.get(PROGRESS_KEY).await?.is_some())
    }

    /// # Errors
    ///
    /// Returns `StorageError` on serialization or backend failures.
    pub async fn save_progress(&self, progress: &ProgressRecord) -> Result<(), StorageError> {
        self.write(PROGRESS_KEY, progress).await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unparseable stored value");
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(key, &raw).await
    }
}
