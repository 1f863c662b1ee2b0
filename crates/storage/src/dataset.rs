//! Loading of quiz datasets in the document-store JSON shape.

use quiz_core::model::{Quiz, QuizDraft, QuizError};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const BUNDLED_DATASET: &str = include_str!("../data/quizzes.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quiz #{index} ({id}) is invalid: {source}")]
    InvalidQuiz {
        index: usize,
        id: String,
        #[source]
        source: QuizError,
    },

    #[error("quiz id {0} appears more than once")]
    DuplicateQuiz(String),
}

/// Parse and validate a dataset, keeping file order.
///
/// # Errors
///
/// Returns `DatasetError` if the JSON is malformed, any quiz fails validation,
/// or two quizzes share an id.
pub fn parse_dataset(json: &str) -> Result<Vec<Quiz>, DatasetError> {
    let drafts: Vec<QuizDraft> = serde_json::from_str(json)?;
    validate_drafts(drafts)
}

/// Validate raw drafts into quizzes, keeping order.
///
/// # Errors
///
/// Returns `DatasetError` if any quiz fails validation or two quizzes share an id.
pub fn validate_drafts(drafts: Vec<QuizDraft>) -> Result<Vec<Quiz>, DatasetError> {
    let mut seen = HashSet::with_capacity(drafts.len());
    let mut quizzes = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let id = draft.id.clone();
        let quiz = draft
            .validate()
            .map_err(|source| DatasetError::InvalidQuiz { index, id, source })?;
        if !seen.insert(quiz.id().clone()) {
            return Err(DatasetError::DuplicateQuiz(quiz.id().to_string()));
        }
        quizzes.push(quiz);
    }
    Ok(quizzes)
}

/// # Errors
///
/// Returns `DatasetError` if the file cannot be read or does not validate.
pub fn load_dataset_file(path: impl AsRef<Path>) -> Result<Vec<Quiz>, DatasetError> {
    let json = std::fs::read_to_string(path)?;
    parse_dataset(&json)
}

/// Quizzes shipped with the application.
///
/// # Errors
///
/// Returns `DatasetError` only if the bundled file is broken.
pub fn bundled_dataset() -> Result<Vec<Quiz>, DatasetError> {
    parse_dataset(BUNDLED_DATASET)
}
