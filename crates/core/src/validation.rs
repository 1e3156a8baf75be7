//! Form validation for registration and login.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A form field was missing or malformed. The message is user-facing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Passwords do not match!")]
    PasswordMismatch,
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Field-level checks for a registration; uniqueness is checked against storage later.
///
/// # Errors
///
/// Returns the first failing `ValidationError`, checked in order: presence,
/// username length, password length, email shape.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Login only requires both fields to be present.
///
/// # Errors
///
/// Returns `ValidationError::MissingCredentials` if either field is empty.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_registration() {
        assert_eq!(validate_registration("alice", "alice@example.com", "secret"), Ok(()));
    }

    #[test]
    fn registration_checks_in_order() {
        assert_eq!(
            validate_registration("", "bad", "x"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_registration("al", "bad", "x"),
            Err(ValidationError::UsernameTooShort)
        );
        assert_eq!(
            validate_registration("alice", "bad", "12345"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_registration("alice", "bad", "123456"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }

    #[test]
    fn login_needs_both_fields() {
        assert_eq!(validate_login("alice", ""), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_login("", "secret"), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_login("a", "b"), Ok(()));
    }
}
