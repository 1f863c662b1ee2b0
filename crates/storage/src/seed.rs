//! Catalog administration: seeding from a dataset and wiping the catalog.

use chrono::{DateTime, Utc};
use quiz_core::model::Quiz;
use tracing::info;

use crate::repository::{QuizRepository, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { inserted: usize },
    /// The catalog was not empty; nothing was written.
    AlreadySeeded { existing: usize },
}

impl SeedOutcome {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            SeedOutcome::Seeded { inserted } => format!("Successfully seeded {inserted} quizzes"),
            SeedOutcome::AlreadySeeded { .. } => {
                "Database already has quizzes. Clear the database first if you want to reseed."
                    .to_owned()
            }
        }
    }
}

/// Insert `quizzes` into an empty catalog, stamping each with `now`.
///
/// # Errors
///
/// Returns `StorageError` if the catalog cannot be counted or written.
pub async fn seed_quizzes(
    repo: &dyn QuizRepository,
    quizzes: &[Quiz],
    now: DateTime<Utc>,
) -> Result<SeedOutcome, StorageError> {
    let existing = repo.count_quizzes().await?;
    if existing > 0 {
        info!(existing, "catalog already seeded; skipping");
        return Ok(SeedOutcome::AlreadySeeded { existing });
    }
    for quiz in quizzes {
        repo.upsert_quiz(quiz, now).await?;
    }
    info!(inserted = quizzes.len(), "seeded quiz catalog");
    Ok(SeedOutcome::Seeded {
        inserted: quizzes.len(),
    })
}

/// Delete every quiz; returns the number removed.
///
/// # Errors
///
/// Returns `StorageError` if the delete fails.
pub async fn clear_all_quizzes(repo: &dyn QuizRepository) -> Result<usize, StorageError> {
    let deleted = repo.delete_all_quizzes().await?;
    info!(deleted, "cleared quiz catalog");
    Ok(deleted)
}
