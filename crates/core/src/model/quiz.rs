use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{ParseIdError, QuestionId, QuizId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while validating quiz content authored in the dataset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),

    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("unknown difficulty label: {0}")]
    UnknownDifficulty(String),

    #[error("question {question} needs at least two options (found {count})")]
    TooFewOptions { question: String, count: usize },

    #[error("question {question} marks option {index} as correct but has {options} options")]
    CorrectAnswerOutOfRange {
        question: String,
        index: i64,
        options: usize,
    },

    #[error("question id {0} appears more than once")]
    DuplicateQuestion(String),
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty label shown on quiz cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Hard => "Hard",
        }
    }

    /// Badge colour for the difficulty chip; `Hard` uses the neutral fallback.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Difficulty::Beginner => "#10B981",
            Difficulty::Intermediate => "#F59E0B",
            Difficulty::Advanced => "#EF4444",
            Difficulty::Hard => NEUTRAL_DIFFICULTY_COLOR,
        }
    }
}

const NEUTRAL_DIFFICULTY_COLOR: &str = "#6B7280";

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Beginner" => Ok(Self::Beginner),
            "Intermediate" => Ok(Self::Intermediate),
            "Advanced" => Ok(Self::Advanced),
            "Hard" => Ok(Self::Hard),
            other => Err(QuizError::UnknownDifficulty(other.to_owned())),
        }
    }
}

//
// ─── DRAFTS (DATASET SHAPE) ───────────────────────────────────────────────────
//

/// A question exactly as it appears in the quiz dataset JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for a blank id, fewer than two options, or a correct
    /// answer index that does not point at an option.
    pub fn validate(self) -> Result<Question, QuizError> {
        let id = QuestionId::new(self.id)?;
        let count = self.options.len();
        if count < 2 {
            return Err(QuizError::TooFewOptions {
                question: id.to_string(),
                count,
            });
        }
        let correct_option = usize::try_from(self.correct_answer)
            .ok()
            .filter(|idx| *idx < count)
            .ok_or_else(|| QuizError::CorrectAnswerOutOfRange {
                question: id.to_string(),
                index: self.correct_answer,
                options: count,
            })?;

        Ok(Question {
            id,
            prompt: self.question,
            options: self.options,
            correct_option,
            explanation: self.explanation,
        })
    }
}

/// A quiz exactly as it appears in the dataset JSON or the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub duration: u32,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl QuizDraft {
    /// Validate the draft into an immutable `Quiz`.
    ///
    /// A quiz with no questions is accepted here; sessions refuse to start on it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if any field or question fails validation, or if two
    /// questions share an id.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        let id = QuizId::new(self.id)?;
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        let difficulty = self.difficulty.parse::<Difficulty>()?;

        let mut seen = HashSet::with_capacity(self.questions.len());
        let mut questions = Vec::with_capacity(self.questions.len());
        for draft in self.questions {
            let question = draft.validate()?;
            if !seen.insert(question.id.clone()) {
                return Err(QuizError::DuplicateQuestion(question.id.to_string()));
            }
            questions.push(question);
        }

        Ok(Quiz {
            id,
            title,
            description: self.description,
            category: self.category.trim().to_owned(),
            difficulty,
            duration_minutes: self.duration,
            questions,
        })
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Always has at least two options and a
/// correct option index that points inside `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether `option` is a valid index into this question's options.
    #[must_use]
    pub fn accepts(&self, option: usize) -> bool {
        option < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            question: question.prompt.clone(),
            options: question.options.clone(),
            correct_answer: i64::try_from(question.correct_option).unwrap_or(i64::MAX),
            explanation: question.explanation.clone(),
        }
    }
}

//
// ─── QUIZ ─────────────────────────────────────────────────────────────────────
//

/// Immutable quiz definition loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    category: String,
    difficulty: Difficulty,
    duration_minutes: u32,
    questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Case-insensitive title match used by catalog search.
    #[must_use]
    pub fn title_matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty() || self.title.to_lowercase().contains(&term)
    }
}

impl From<&Quiz> for QuizDraft {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.to_string(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            category: quiz.category.clone(),
            difficulty: quiz.difficulty.as_str().to_owned(),
            duration: quiz.duration_minutes,
            questions: quiz.questions.iter().map(QuestionDraft::from).collect(),
            created_at: None,
            updated_at: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
