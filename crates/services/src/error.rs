//! Shared error types for the services crate.

use thiserror::Error;

use cbt_core::{PaperError, ValidationError};
use storage::{SqliteInitError, StorageError};

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("Please log in to start an exam")]
    NotAuthenticated,
    #[error("Exam not found: {0}")]
    UnknownExam(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Errors emitted by the test session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestSessionError {
    #[error(transparent)]
    Paper(#[from] PaperError),
    #[error("test session already started")]
    AlreadyStarted,
    #[error("test session is not in progress")]
    NotInProgress,
    #[error("option {option} is not available for a question with {count} options")]
    InvalidOption { option: usize, count: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuoteService`. Callers normally fall back to a local quote.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuoteError {
    #[error("Quote service unavailable (status {0})")]
    HttpStatus(reqwest::StatusCode),
    #[error("quote service timed out")]
    Timeout,
    #[error("quote service returned an empty quote")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
