use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::answers::AnswerSheet;
use crate::model::ids::QuizId;
use crate::scoring::{ScoreResult, rounded_div, rounded_percentage};

/// Summary of one completed quiz attempt, as persisted in the local state blob.
///
/// The wire shape is camelCase with answers stored as string-to-string pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub quiz_id: QuizId,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_result(
        quiz_id: QuizId,
        result: &ScoreResult,
        answers: &AnswerSheet,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            quiz_id,
            score: result.score,
            total_questions: result.total,
            completed_at,
            answers: answers.to_string_map(),
        }
    }

    /// Rounded percentage for this attempt; 0 when the quiz had no questions.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        rounded_percentage(self.score, self.total_questions)
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.score == self.total_questions
    }

    #[must_use]
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet::from_string_map(&self.answers)
    }
}

/// Aggregate statistics shown on the profile screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub total_attempts: u32,
    /// Rounded mean of raw scores.
    pub average_score: u32,
    /// Rounded mean of per-attempt percentages.
    pub average_percentage: u32,
    pub perfect_scores: u32,
}

impl ProgressStats {
    #[must_use]
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let total_attempts = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let score_sum: u64 = records.iter().map(|r| u64::from(r.score)).sum();
        let percentage_sum: u64 = records.iter().map(|r| u64::from(r.percentage())).sum();
        let perfect_scores =
            u32::try_from(records.iter().filter(|r| r.is_perfect()).count()).unwrap_or(u32::MAX);

        Self {
            total_attempts,
            average_score: rounded_div(score_sum, u64::from(total_attempts)),
            average_percentage: rounded_div(percentage_sum, u64::from(total_attempts)),
            perfect_scores,
        }
    }
}
