use cbt_core::ValidationError;
use cbt_core::model::SessionRecord;
use services::{AuthError, AuthService};

use crate::routes::Route;
use crate::vm::modal_vm::ModalKind;
use crate::vm::toast_vm::Notice;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Result of submitting an auth form: the toast to show, the modal to open
/// next (if any), and where to navigate (if anywhere).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormOutcome {
    pub notice: Notice,
    pub accepted: bool,
    pub next_modal: Option<ModalKind>,
    pub redirect: Option<Route>,
}

impl FormOutcome {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            notice: Notice::error(message),
            accepted: false,
            next_modal: None,
            redirect: None,
        }
    }
}

/// # Errors
///
/// Returns `AuthError::Storage` for backend failures; validation problems
/// come back as a rejected outcome.
pub async fn submit_login(auth: &AuthService, form: &LoginForm) -> Result<FormOutcome, AuthError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(FormOutcome::rejected(FILL_ALL_FIELDS));
    }
    match auth.login(&form.username, &form.password).await {
        Ok(_) => Ok(FormOutcome {
            notice: Notice::success("Login successful! Redirecting to dashboard..."),
            accepted: true,
            next_modal: None,
            redirect: Some(Route::Dashboard),
        }),
        Err(AuthError::Validation(err)) => Ok(FormOutcome::rejected(err.to_string())),
        Err(err) => Err(err),
    }
}

/// # Errors
///
/// Returns `AuthError::Storage` for backend failures; validation problems
/// come back as a rejected outcome.
pub async fn submit_register(
    auth: &AuthService,
    form: &RegisterForm,
) -> Result<FormOutcome, AuthError> {
    if [&form.username, &form.email, &form.password, &form.confirm_password]
        .iter()
        .any(|field| field.is_empty())
    {
        return Ok(FormOutcome::rejected(FILL_ALL_FIELDS));
    }
    if form.password != form.confirm_password {
        return Ok(FormOutcome::rejected(
            ValidationError::PasswordMismatch.to_string(),
        ));
    }
    match auth
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(_) => Ok(FormOutcome {
            notice: Notice::success("Registration successful! Please login with your new account."),
            accepted: true,
            next_modal: Some(ModalKind::Login),
            redirect: None,
        }),
        Err(AuthError::Validation(err)) => Ok(FormOutcome::rejected(err.to_string())),
        Err(err) => Err(err),
    }
}

/// Navigation auth link text.
#[must_use]
pub fn auth_link_label(session: Option<&SessionRecord>) -> String {
    match session {
        Some(session) => format!("👤 {} | Logout", session.username),
        None => "Login".to_string(),
    }
}

#[must_use]
pub fn welcome_notice(session: &SessionRecord) -> Notice {
    Notice::success(format!("Welcome back, {}!", session.username))
}

#[must_use]
pub fn logout_notice() -> Notice {
    Notice::info("Logged out successfully")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cbt_core::time::{fixed_clock, fixed_now};
    use storage::{InMemoryStore, LocalRecords};

    use crate::vm::ToastKind;

    fn auth() -> AuthService {
        AuthService::new(fixed_clock(), LocalRecords::new(Arc::new(InMemoryStore::new())))
    }

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[tokio::test]
    async fn register_checks_confirmation_first() {
        let auth = auth();
        let outcome = submit_register(&auth, &register_form("secret", "secreT"))
            .await
            .unwrap();
        assert_eq!(outcome.notice.message, "Passwords do not match!");
        assert!(!outcome.accepted);

        let outcome = submit_register(&auth, &register_form("secret", "secret"))
            .await
            .unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.next_modal, Some(ModalKind::Login));
        assert_eq!(outcome.notice.kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn register_surfaces_service_messages() {
        let auth = auth();
        let outcome = submit_register(&auth, &register_form("short", "short"))
            .await
            .unwrap();
        assert_eq!(outcome.notice.message, "Password must be at least 6 characters");

        let outcome = submit_register(&auth, &RegisterForm::default()).await.unwrap();
        assert_eq!(outcome.notice.message, FILL_ALL_FIELDS);
    }

    #[tokio::test]
    async fn login_redirects_to_dashboard() {
        let auth = auth();
        let outcome = submit_login(&auth, &LoginForm::default()).await.unwrap();
        assert_eq!(outcome.notice.message, FILL_ALL_FIELDS);

        let form = LoginForm {
            username: "alice".into(),
            password: "pw".into(),
        };
        let outcome = submit_login(&auth, &form).await.unwrap();
        assert_eq!(outcome.redirect, Some(Route::Dashboard));
        assert_eq!(
            outcome.notice.message,
            "Login successful! Redirecting to dashboard..."
        );
    }

    #[test]
    fn auth_link_and_greetings() {
        let session = SessionRecord::new("alice", fixed_now());
        assert_eq!(auth_link_label(Some(&session)), "👤 alice | Logout");
        assert_eq!(auth_link_label(None), "Login");
        assert_eq!(welcome_notice(&session).message, "Welcome back, alice!");
        assert_eq!(logout_notice().kind, ToastKind::Info);
    }
}
