use std::sync::Arc;

use tracing::info;

use quiz_core::model::{ProgressRecord, QuizId};

use super::session::{Advance, QuizSession};
use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::{CatalogError, SessionError, ValidationError};
use crate::progress_service::ProgressStore;

/// Starts sessions from the catalog and records completed attempts.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    catalog: CatalogService,
    progress: ProgressStore,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, catalog: CatalogService, progress: ProgressStore) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    /// Load `quiz_id` and start at its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown quiz, `EmptyQuiz` for a
    /// quiz without questions, or a catalog error.
    pub async fn start(&self, quiz_id: &QuizId) -> Result<QuizSession, SessionError> {
        let quiz = match self.catalog.require(quiz_id).await {
            Ok(quiz) => quiz,
            Err(CatalogError::NotFound(id)) => return Err(SessionError::NotFound(id)),
            Err(err) => return Err(err.into()),
        };
        QuizSession::new(quiz)
    }

    /// Record the completed attempt in the progress store.
    ///
    /// Calling it again for the same attempt returns the stored record without
    /// writing a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotCompleted` while the session is in progress.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<ProgressRecord, SessionError> {
        if let Some(record) = session.recorded() {
            return Ok(record.clone());
        }
        let result = session.result().ok_or(ValidationError::NotCompleted)?;
        let record = ProgressRecord::from_result(
            session.quiz().id().clone(),
            &result,
            session.answers(),
            self.clock.now(),
        );
        self.progress.record(record.clone()).await;
        session.mark_recorded(record.clone());
        info!(
            quiz = %record.quiz_id,
            score = record.score,
            total = record.total_questions,
            "quiz attempt recorded"
        );
        Ok(record)
    }

    /// `advance`, recording the attempt when it completes the quiz.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` from `advance`.
    pub async fn advance_and_record(
        &self,
        session: &mut QuizSession,
    ) -> Result<Advance, SessionError> {
        let step = session.advance()?;
        if matches!(step, Advance::Completed(_)) {
            self.submit(session).await?;
        }
        Ok(step)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_state::LocalStateStore;
    use quiz_core::model::{QuestionDraft, Quiz, QuizDraft};
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn quiz(id: &str, questions: usize) -> Quiz {
        QuizDraft {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            category: "Test".into(),
            difficulty: "Hard".into(),
            duration: 1,
            questions: (0..questions)
                .map(|i| QuestionDraft {
                    id: format!("q{i}"),
                    question: "?".into(),
                    options: vec!["yes".into(), "no".into()],
                    correct_answer: 0,
                    explanation: String::new(),
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
        .validate()
        .unwrap()
    }

    async fn service() -> QuizSessionService {
        let repo = Arc::new(InMemoryRepository::with_quizzes(vec![
            quiz("two", 2),
            quiz("empty", 0),
        ]));
        let state = Arc::new(LocalStateStore::load(repo.clone()).await);
        QuizSessionService::new(
            fixed_clock(),
            CatalogService::new(repo),
            ProgressStore::new(state),
        )
    }

    #[tokio::test]
    async fn start_reports_missing_and_empty_quizzes() {
        let svc = service().await;
        assert!(matches!(
            svc.start(&QuizId::new("nope").unwrap()).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            svc.start(&QuizId::new("empty").unwrap()).await,
            Err(SessionError::EmptyQuiz(_))
        ));
    }

    #[tokio::test]
    async fn completing_records_once() {
        let svc = service().await;
        let mut session = svc.start(&QuizId::new("two").unwrap()).await.unwrap();

        assert!(matches!(
            svc.submit(&mut session).await,
            Err(SessionError::Validation(ValidationError::NotCompleted))
        ));

        session.select_current(0).unwrap();
        assert_eq!(
            svc.advance_and_record(&mut session).await.unwrap(),
            Advance::Moved { index: 1 }
        );
        session.select_current(1).unwrap();
        let step = svc.advance_and_record(&mut session).await.unwrap();
        assert!(matches!(step, Advance::Completed(r) if r.score == 1 && r.percentage == 50));

        let again = svc.submit(&mut session).await.unwrap();
        assert_eq!(again.completed_at, fixed_now());
        assert_eq!(again.answers.get("q1").map(String::as_str), Some("1"));
        assert_eq!(svc.progress().list().len(), 1);
    }
}
