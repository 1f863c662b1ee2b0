//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::forms::FieldErrors;
use quiz_core::model::{QuestionId, QuizId};
use storage::dataset::DatasetError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Misuse of a quiz session: the requested transition is not allowed in the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("question {0} has not been answered")]
    Unanswered(QuestionId),
    #[error("option {option} is out of range for question {question} ({options} options)")]
    OptionOutOfRange {
        question: QuestionId,
        option: usize,
        options: usize,
    },
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("session is already completed")]
    AlreadyCompleted,
    #[error("session is not completed yet")]
    NotCompleted,
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error("quiz {0} has no questions")]
    EmptyQuiz(QuizId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failure reported by the identity provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    AccountExists,
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("no verification is pending")]
    NothingPending,
    #[error("not signed in")]
    NotSignedIn,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("Additional verification required. Please check your email.")]
    VerificationRequired,
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NotificationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotificationError {
    #[error("notification title cannot be empty")]
    EmptyTitle,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    RemoteCatalog(#[from] reqwest::Error),
}
