use std::collections::HashMap;

use quiz_core::model::{ProgressRecord, ProgressStats, Quiz};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsVm {
    pub total_attempts: u32,
    pub average_score: u32,
    pub average_percentage: u32,
    pub perfect_scores: u32,
}

impl From<ProgressStats> for StatsVm {
    fn from(stats: ProgressStats) -> Self {
        Self {
            total_attempts: stats.total_attempts,
            average_score: stats.average_score,
            average_percentage: stats.average_percentage,
            perfect_scores: stats.perfect_scores,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptVm {
    pub quiz_id: String,
    pub quiz_title: String,
    pub score_str: String,
    pub percentage: u32,
    pub perfect: bool,
    pub completed_at_str: String,
}

/// History rows, most recent first. Attempts at quizzes no longer in the
/// catalog fall back to the quiz id as title.
#[must_use]
pub fn map_attempts(records: &[ProgressRecord], quizzes: &[Quiz], limit: usize) -> Vec<AttemptVm> {
    let titles: HashMap<&str, &str> = quizzes
        .iter()
        .map(|q| (q.id().as_str(), q.title()))
        .collect();
    records
        .iter()
        .take(limit)
        .map(|record| {
            let id = record.quiz_id.as_str();
            AttemptVm {
                quiz_id: id.to_owned(),
                quiz_title: titles.get(id).copied().unwrap_or(id).to_owned(),
                score_str: format!("{}/{}", record.score, record.total_questions),
                percentage: record.percentage(),
                perfect: record.is_perfect(),
                completed_at_str: format_datetime(record.completed_at),
            }
        })
        .collect()
}
