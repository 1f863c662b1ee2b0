use std::fmt;

use quiz_core::model::{AnswerSheet, ProgressRecord, Question, QuestionId, Quiz};
use quiz_core::scoring::{self, AnswerReview, ScoreResult};
use tracing::debug;

use super::progress::SessionProgress;
use crate::error::{SessionError, ValidationError};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress { index: usize },
    Completed(ScoreResult),
}

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { index: usize },
    Completed(ScoreResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz, driven question by question.
///
/// Every entry in the answer sheet refers to a question of this quiz and an
/// option index inside that question's options.
pub struct QuizSession {
    quiz: Quiz,
    answers: AnswerSheet,
    state: SessionState,
    recorded: Option<ProgressRecord>,
}

impl QuizSession {
    /// Start at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuiz` if the quiz has no questions.
    pub fn new(quiz: Quiz) -> Result<Self, SessionError> {
        if !quiz.has_questions() {
            return Err(SessionError::EmptyQuiz(quiz.id().clone()));
        }
        Ok(Self {
            quiz,
            answers: AnswerSheet::new(),
            state: SessionState::InProgress { index: 0 },
            recorded: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<ScoreResult> {
        match self.state {
            SessionState::Completed(result) => Some(result),
            SessionState::InProgress { .. } => None,
        }
    }

    /// Index of the question on screen; `None` once completed.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::InProgress { index } => Some(index),
            SessionState::Completed(_) => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|idx| self.quiz.question(idx))
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quiz.question_count()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index()
            .is_some_and(|idx| idx + 1 == self.quiz.question_count())
    }

    #[must_use]
    pub fn selected_for(&self, question: &QuestionId) -> Option<usize> {
        self.answers.get(question)
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<usize> {
        self.current_question()
            .and_then(|q| self.answers.get(q.id()))
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.current_selection().is_some()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.question_count();
        SessionProgress {
            index: self.current_index().unwrap_or(total.saturating_sub(1)),
            total,
            answered: self.answers.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Record (or replace) the choice for a question. The current index does not move.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the session is completed, the question is not
    /// part of the quiz, or the option is out of range.
    pub fn select_answer(
        &mut self,
        question: &QuestionId,
        option: usize,
    ) -> Result<(), ValidationError> {
        if self.is_complete() {
            return Err(ValidationError::AlreadyCompleted);
        }
        let q = self
            .quiz
            .question_by_id(question)
            .ok_or_else(|| ValidationError::UnknownQuestion(question.clone()))?;
        if !q.accepts(option) {
            return Err(ValidationError::OptionOutOfRange {
                question: question.clone(),
                option,
                options: q.option_count(),
            });
        }
        self.answers.select(question.clone(), option);
        Ok(())
    }

    /// # Errors
    ///
    /// Same as `select_answer`.
    pub fn select_current(&mut self, option: usize) -> Result<(), ValidationError> {
        let id = self
            .current_question()
            .map(|q| q.id().clone())
            .ok_or(ValidationError::AlreadyCompleted)?;
        self.select_answer(&id, option)
    }

    /// Move to the next question, or score the attempt on the last one.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Unanswered` if the current question has no answer,
    /// or `AlreadyCompleted` after completion. State is unchanged on error.
    pub fn advance(&mut self) -> Result<Advance, ValidationError> {
        let SessionState::InProgress { index } = self.state else {
            return Err(ValidationError::AlreadyCompleted);
        };
        let question = self
            .quiz
            .question(index)
            .ok_or(ValidationError::AlreadyCompleted)?;
        if !self.answers.contains(question.id()) {
            return Err(ValidationError::Unanswered(question.id().clone()));
        }

        if index + 1 < self.quiz.question_count() {
            self.state = SessionState::InProgress { index: index + 1 };
            debug!(quiz = %self.quiz.id(), index = index + 1, "advanced");
            return Ok(Advance::Moved { index: index + 1 });
        }

        let result = scoring::score(&self.quiz, &self.answers);
        self.state = SessionState::Completed(result);
        debug!(
            quiz = %self.quiz.id(),
            score = result.score,
            total = result.total,
            "completed"
        );
        Ok(Advance::Completed(result))
    }

    /// Step back one question.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::AtFirstQuestion` on the first question, or
    /// `AlreadyCompleted` after completion.
    pub fn retreat(&mut self) -> Result<usize, ValidationError> {
        match self.state {
            SessionState::Completed(_) => Err(ValidationError::AlreadyCompleted),
            SessionState::InProgress { index: 0 } => Err(ValidationError::AtFirstQuestion),
            SessionState::InProgress { index } => {
                self.state = SessionState::InProgress { index: index - 1 };
                Ok(index - 1)
            }
        }
    }

    /// Start a fresh attempt on the same quiz.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotCompleted` while the attempt is still running.
    pub fn restart(&mut self) -> Result<(), ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::NotCompleted);
        }
        self.answers.clear();
        self.state = SessionState::InProgress { index: 0 };
        self.recorded = None;
        debug!(quiz = %self.quiz.id(), "restarted");
        Ok(())
    }

    /// Per-question review rows for the results screen.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotCompleted` before completion.
    pub fn review(&self) -> Result<Vec<AnswerReview<'_>>, ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::NotCompleted);
        }
        Ok(scoring::review(&self.quiz, &self.answers))
    }

    /// Progress record already written for this attempt, if any.
    #[must_use]
    pub fn recorded(&self) -> Option<&ProgressRecord> {
        self.recorded.as_ref()
    }

    pub(crate) fn mark_recorded(&mut self, record: ProgressRecord) {
        self.recorded = Some(record);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", self.quiz.id())
            .field("questions", &self.quiz.question_count())
            .field("answered", &self.answers.len())
            .field("state", &self.state)
            .field("recorded", &self.recorded.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, QuizDraft};

    fn quiz(correct: &[i64]) -> Quiz {
        QuizDraft {
            id: "quiz".into(),
            title: "Quiz".into(),
            description: String::new(),
            category: "Test".into(),
            difficulty: "Beginner".into(),
            duration: 5,
            questions: correct
                .iter()
                .enumerate()
                .map(|(i, c)| QuestionDraft {
                    id: format!("q{}", i + 1),
                    question: format!("Question {}", i + 1),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: *c,
                    explanation: String::new(),
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
        .validate()
        .unwrap()
    }

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[test]
    fn empty_quiz_cannot_start() {
        assert!(matches!(
            QuizSession::new(quiz(&[])),
            Err(SessionError::EmptyQuiz(_))
        ));
    }

    #[test]
    fn walks_to_completion_and_scores() {
        let mut session = QuizSession::new(quiz(&[1, 0, 2, 3])).unwrap();
        for option in [1, 0, 0, 3] {
            session.select_current(option).unwrap();
            session.advance().unwrap();
        }
        let result = session.result().unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(result.percentage, 75);
        assert_eq!(session.current_index(), None);
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = QuizSession::new(quiz(&[0, 0])).unwrap();
        assert_eq!(session.advance(), Err(ValidationError::Unanswered(qid("q1"))));
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
    }

    #[test]
    fn selection_is_bounds_checked() {
        let mut session = QuizSession::new(quiz(&[0, 0])).unwrap();
        assert!(matches!(
            session.select_answer(&qid("q1"), 4),
            Err(ValidationError::OptionOutOfRange { option: 4, options: 4, .. })
        ));
        assert_eq!(
            session.select_answer(&qid("q9"), 0),
            Err(ValidationError::UnknownQuestion(qid("q9")))
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn answers_can_be_changed_and_set_ahead() {
        let mut session = QuizSession::new(quiz(&[0, 0])).unwrap();
        session.select_answer(&qid("q2"), 3).unwrap();
        session.select_current(1).unwrap();
        session.select_current(2).unwrap();
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.selected_for(&qid("q1")), Some(2));
        assert_eq!(session.selected_for(&qid("q2")), Some(3));
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn retreat_stops_at_first_question() {
        let mut session = QuizSession::new(quiz(&[0, 0, 0])).unwrap();
        assert_eq!(session.retreat(), Err(ValidationError::AtFirstQuestion));
        session.select_current(0).unwrap();
        session.advance().unwrap();
        assert_eq!(session.retreat(), Ok(0));
        assert_eq!(session.current_selection(), Some(0));
    }

    #[test]
    fn completed_session_rejects_changes_until_restart() {
        let mut session = QuizSession::new(quiz(&[2])).unwrap();
        assert_eq!(session.restart(), Err(ValidationError::NotCompleted));
        session.select_current(2).unwrap();
        assert!(matches!(session.advance(), Ok(Advance::Completed(_))));

        assert_eq!(session.select_current(1), Err(ValidationError::AlreadyCompleted));
        assert_eq!(session.advance(), Err(ValidationError::AlreadyCompleted));
        assert_eq!(session.retreat(), Err(ValidationError::AlreadyCompleted));
        assert!(session.result().unwrap().is_perfect());

        session.restart().unwrap();
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
        assert!(session.answers().is_empty());
        assert!(session.recorded().is_none());
    }

    #[test]
    fn progress_tracks_position() {
        let mut session = QuizSession::new(quiz(&[0, 0, 0, 0])).unwrap();
        session.select_current(0).unwrap();
        session.advance().unwrap();
        let progress = session.progress();
        assert_eq!(progress.index, 1);
        assert_eq!(progress.answered, 1);
        assert!((progress.percent() - 50.0).abs() < f64::EPSILON);
        assert_eq!(progress.label(), "Question 2 of 4");
    }

    #[test]
    fn review_only_after_completion() {
        let mut session = QuizSession::new(quiz(&[1, 2])).unwrap();
        assert_eq!(session.review().unwrap_err(), ValidationError::NotCompleted);
        session.select_current(1).unwrap();
        session.advance().unwrap();
        session.select_current(0).unwrap();
        session.advance().unwrap();
        let rows = session.review().unwrap();
        assert!(rows[0].is_correct);
        assert!(!rows[1].is_correct);
        assert_eq!(rows[1].correct_text(), Some("c"));
    }
}
