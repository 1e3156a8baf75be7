use cbt_core::Clock;
use cbt_core::model::{ProgressRecord, SessionRecord, UserRecord};
use cbt_core::validation::{ValidationError, validate_login, validate_registration};
use storage::LocalRecords;

use crate::error::AuthError;

/// Local account registry and login marker.
///
/// There are no passwords on file: login only checks that both fields are
/// filled in. Registration is uniqueness-checked against the stored list.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    records: LocalRecords,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, records: LocalRecords) -> Self {
        Self { clock, records }
    }

    /// Validate and append a new account. Does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for bad fields or a taken
    /// username/email, and `AuthError::Storage` for backend failures.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        validate_registration(username, email, password)?;

        let mut users = self.records.stored_users().await?;
        if users.has_username(username) {
            return Err(ValidationError::UsernameTaken.into());
        }
        if users.has_email(email) {
            return Err(ValidationError::EmailTaken.into());
        }

        let user = UserRecord::new(username, email, self.clock.now());
        users.push(&user)?;
        self.records.save_users(&users).await?;

        tracing::info!(username, user_id = %user.user_id, "registered user");
        Ok(user)
    }

    /// Mark `username` as logged in and make sure a progress record exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is empty and
    /// `AuthError::Storage` for backend failures.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionRecord, AuthError> {
        validate_login(username, password)?;

        let now = self.clock.now();
        let session = SessionRecord::new(username, now);
        self.records.set_current_user(&session).await?;

        if !self.records.has_progress().await? {
            self.records.save_progress(&ProgressRecord::zeroed(now)).await?;
        }

        tracing::info!(username, "user logged in");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session marker cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.records.clear_current_user().await?;
        tracing::info!("user logged out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be read.
    pub async fn current_user(&self) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.records.current_user().await?)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be read.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.current_user().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cbt_core::time::{fixed_clock, fixed_now};
    use storage::records::{CURRENT_USER_KEY, PROGRESS_KEY};
    use storage::{InMemoryStore, KeyValueStore};

    fn service() -> (InMemoryStore, AuthService) {
        let store = InMemoryStore::new();
        let records = LocalRecords::new(Arc::new(store.clone()));
        (store, AuthService::new(fixed_clock(), records))
    }

    fn validation(err: AuthError) -> ValidationError {
        match err {
            AuthError::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_appends_user_without_logging_in() {
        let (_, auth) = service();
        let user = auth
            .register("alice", "alice@example.com", "secret")
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.created_at, fixed_now());
        assert!(user.user_id.as_str().starts_with("user_"));
        assert!(!auth.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_keeps_list() {
        let (store, auth) = service();
        auth.register("alice", "alice@example.com", "secret")
            .await
            .unwrap();
        let before = store.get("users").await.unwrap();

        let err = auth
            .register("alice", "other@example.com", "secret")
            .await
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::UsernameTaken);

        let err = auth
            .register("bob", "alice@example.com", "secret")
            .await
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::EmailTaken);

        assert_eq!(store.get("users").await.unwrap(), before);
    }

    #[tokio::test]
    async fn register_checks_entries_that_do_not_fit_the_schema() {
        let (store, auth) = service();
        let stored = r#"[{"username":"bob","email":"bob@example.com","userId":"user_abcdefghi","createdAt":0},{"username":"carol","email":"carol@example.com"}]"#;
        store.set("users", stored).await.unwrap();

        let err = auth
            .register("bob", "bob@example.com", "secret")
            .await
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::UsernameTaken);
        let err = auth
            .register("carol2", "carol@example.com", "secret")
            .await
            .unwrap_err();
        assert_eq!(validation(err), ValidationError::EmailTaken);
        assert_eq!(store.get("users").await.unwrap().as_deref(), Some(stored));

        auth.register("dave", "dave@example.com", "secret")
            .await
            .unwrap();
        let raw = store.get("users").await.unwrap().unwrap();
        assert!(raw.contains("carol@example.com"));
        assert!(raw.contains("user_abcdefghi"));
        assert!(raw.contains("dave@example.com"));
    }

    #[tokio::test]
    async fn register_reports_first_field_problem() {
        let (_, auth) = service();
        let err = auth.register("al", "alice@example.com", "secret").await.unwrap_err();
        assert_eq!(
            validation(err).to_string(),
            "Username must be at least 3 characters"
        );
        let err = auth.register("alice", "nope", "secret").await.unwrap_err();
        assert_eq!(validation(err), ValidationError::InvalidEmail);
    }

    #[tokio::test]
    async fn login_writes_session_and_zeroed_progress() {
        let (store, auth) = service();
        let session = auth.login("alice", "anything").await.unwrap();

        assert_eq!(session.login_time, fixed_now());
        assert_eq!(
            auth.current_user().await.unwrap().map(|s| s.username),
            Some("alice".into())
        );
        let raw = store.get(PROGRESS_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"testsCompleted\":0"));
    }

    #[tokio::test]
    async fn login_keeps_existing_progress() {
        let (store, auth) = service();
        store
            .set(PROGRESS_KEY, r#"{"testsCompleted":4,"averageScore":70}"#)
            .await
            .unwrap();
        auth.login("alice", "pw").await.unwrap();
        assert_eq!(
            store.get(PROGRESS_KEY).await.unwrap().as_deref(),
            Some(r#"{"testsCompleted":4,"averageScore":70}"#)
        );
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (_, auth) = service();
        let err = auth.login("alice", "").await.unwrap_err();
        assert_eq!(validation(err), ValidationError::MissingCredentials);
        assert!(!auth.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let (store, auth) = service();
        auth.login("alice", "pw").await.unwrap();
        auth.logout().await.unwrap();
        assert!(store.get(CURRENT_USER_KEY).await.unwrap().is_none());
        assert!(auth.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_session_reads_as_logged_out() {
        let (store, auth) = service();
        store.set(CURRENT_USER_KEY, "{oops").await.unwrap();
        assert!(!auth.is_authenticated().await.unwrap());
    }
}
