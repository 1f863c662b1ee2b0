use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{ProgressRecord, Quiz, QuizId};
use storage::repository::{QuizRepository, StorageError};

use crate::error::CatalogError;

/// Number of quizzes suggested on the home screen.
pub const RECOMMENDED_LIMIT: usize = 2;

/// Read-only access to the quiz catalog.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn QuizRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(repo: Arc<dyn QuizRepository>) -> Self {
        Self { repo }
    }

    /// All quizzes in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn list_all(&self) -> Result<Vec<Quiz>, CatalogError> {
        Ok(self.repo.list_quizzes().await?)
    }

    /// Look up a quiz; a missing id is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn get_by_id(&self, id: &QuizId) -> Result<Option<Quiz>, CatalogError> {
        match self.repo.get_quiz(id).await {
            Ok(quiz) => Ok(Some(quiz)),
            Err(StorageError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Like `get_by_id`, but a missing quiz is `CatalogError::NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` or `CatalogError::Storage`.
    pub async fn require(&self, id: &QuizId) -> Result<Quiz, CatalogError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Quiz>, CatalogError> {
        let quizzes = self.list_all().await?;
        Ok(quizzes
            .into_iter()
            .filter(|q| q.category() == category)
            .collect())
    }

    /// Distinct categories in first-seen catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let quizzes = self.list_all().await?;
        Ok(categories_of(&quizzes))
    }

    /// Case-insensitive title search; a blank term matches everything.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Quiz>, CatalogError> {
        self.filter(term, None).await
    }

    /// Title search combined with an optional exact category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn filter(
        &self,
        term: &str,
        category: Option<&str>,
    ) -> Result<Vec<Quiz>, CatalogError> {
        let quizzes = self.list_all().await?;
        Ok(filter_quizzes(quizzes, term, category))
    }

    /// Quizzes worth suggesting: never attempted, or last attempt not perfect.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog source fails.
    pub async fn recommended(
        &self,
        progress: &[ProgressRecord],
        limit: usize,
    ) -> Result<Vec<Quiz>, CatalogError> {
        let quizzes = self.list_all().await?;
        Ok(recommend(quizzes, progress, limit))
    }
}

#[must_use]
pub fn categories_of(quizzes: &[Quiz]) -> Vec<String> {
    let mut seen = HashSet::new();
    quizzes
        .iter()
        .map(Quiz::category)
        .filter(|c| seen.insert(*c))
        .map(str::to_owned)
        .collect()
}

#[must_use]
pub fn filter_quizzes(quizzes: Vec<Quiz>, term: &str, category: Option<&str>) -> Vec<Quiz> {
    quizzes
        .into_iter()
        .filter(|q| q.title_matches(term))
        .filter(|q| category.is_none_or(|c| q.category() == c))
        .collect()
}

/// `progress` is most-recent-first, so the first record per quiz is its latest attempt.
#[must_use]
pub fn recommend(quizzes: Vec<Quiz>, progress: &[ProgressRecord], limit: usize) -> Vec<Quiz> {
    quizzes
        .into_iter()
        .filter(|quiz| {
            let total = u32::try_from(quiz.question_count()).unwrap_or(u32::MAX);
            progress
                .iter()
                .find(|p| &p.quiz_id == quiz.id())
                .is_none_or(|latest| latest.score < total)
        })
        .take(limit)
        .collect()
}
