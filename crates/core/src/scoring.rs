//! Scoring of answer sheets against a quiz.
//!
//! Scoring is pure: the same quiz and sheet always produce the same result.

use crate::model::{AnswerSheet, Question, Quiz};

/// Minimum percentage counted as a pass on the results screen.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
}

impl ScoreResult {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score,
            total,
            percentage: rounded_percentage(score, total),
        }
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score == self.total
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_THRESHOLD_PERCENT
    }

    #[must_use]
    pub fn tier(&self) -> ResultTier {
        if self.is_perfect() {
            ResultTier::Perfect
        } else if self.passed() {
            ResultTier::Passed
        } else {
            ResultTier::NeedsPractice
        }
    }
}

/// Headline bucket for a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Perfect,
    Passed,
    NeedsPractice,
}

impl ResultTier {
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            ResultTier::Perfect => "Perfect Score!",
            ResultTier::Passed => "Great Job!",
            ResultTier::NeedsPractice => "Good Effort!",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            ResultTier::Perfect => "trophy",
            ResultTier::Passed => "checkmark-circle",
            ResultTier::NeedsPractice => "refresh-circle",
        }
    }
}

/// Count the questions whose recorded answer equals the correct option.
///
/// A question without an answer never counts as correct. A quiz with no
/// questions scores 0 of 0 at 0%.
#[must_use]
pub fn score(quiz: &Quiz, answers: &AnswerSheet) -> ScoreResult {
    let correct = quiz
        .questions()
        .iter()
        .filter(|q| answers.get(q.id()).is_some_and(|opt| q.is_correct(opt)))
        .count();
    let total = quiz.question_count();
    ScoreResult::new(saturating_u32(correct), saturating_u32(total))
}

/// One row of the post-quiz answer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview<'a> {
    pub number: usize,
    pub question: &'a Question,
    pub selected: Option<usize>,
    pub is_correct: bool,
}

impl AnswerReview<'_> {
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        self.selected.and_then(|idx| self.question.option(idx))
    }

    #[must_use]
    pub fn correct_text(&self) -> Option<&str> {
        self.question.option(self.question.correct_option())
    }
}

#[must_use]
pub fn review<'a>(quiz: &'a Quiz, answers: &AnswerSheet) -> Vec<AnswerReview<'a>> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let selected = answers.get(question.id());
            AnswerReview {
                number: idx + 1,
                question,
                selected,
                is_correct: selected.is_some_and(|opt| question.is_correct(opt)),
            }
        })
        .collect()
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
#[must_use]
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    rounded_div(u64::from(part) * 100, u64::from(whole))
}

/// Integer division rounding halves up; 0 when `den` is 0.
#[must_use]
pub fn rounded_div(num: u64, den: u64) -> u32 {
    if den == 0 {
        return 0;
    }
    u32::try_from((2 * num + den) / (2 * den)).unwrap_or(u32::MAX)
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionDraft, QuestionId, QuizDraft};

    fn quiz_with(correct: &[i64]) -> Quiz {
        QuizDraft {
            id: "scoring".into(),
            title: "Scoring".into(),
            description: String::new(),
            category: "Test".into(),
            difficulty: "Beginner".into(),
            duration: 5,
            questions: correct
                .iter()
                .enumerate()
                .map(|(i, c)| QuestionDraft {
                    id: format!("q{}", i + 1),
                    question: format!("Q{}", i + 1),
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

    fn sheet(pairs: &[(&str, usize)]) -> AnswerSheet {
        pairs
            .iter()
            .map(|(id, opt)| (QuestionId::new(*id).unwrap(), *opt))
            .collect()
    }

    #[test]
    fn three_of_four_is_seventy_five_percent() {
        let quiz = quiz_with(&[1, 0, 2, 3]);
        let answers = sheet(&[("q1", 1), ("q2", 0), ("q3", 0), ("q4", 3)]);
        let result = score(&quiz, &answers);
        assert_eq!(result, ScoreResult { score: 3, total: 4, percentage: 75 });
        assert!(result.passed());
        assert_eq!(result.tier(), ResultTier::Passed);
    }

    #[test]
    fn no_answers_scores_zero() {
        let quiz = quiz_with(&[0, 1, 2, 3, 0]);
        let result = score(&quiz, &AnswerSheet::new());
        assert_eq!(result.score, 0);
        assert_eq!(result.total, 5);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.tier(), ResultTier::NeedsPractice);
    }

    #[test]
    fn scoring_is_idempotent() {
        let quiz = quiz_with(&[1, 1, 1]);
        let answers = sheet(&[("q1", 1), ("q3", 2)]);
        assert_eq!(score(&quiz, &answers), score(&quiz, &answers));
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn empty_quiz_does_not_divide_by_zero() {
        let quiz = quiz_with(&[]);
        let result = score(&quiz, &AnswerSheet::new());
        assert_eq!(result, ScoreResult { score: 0, total: 0, percentage: 0 });
        assert!(!result.is_perfect());
    }

    #[test]
    fn perfect_tier_wins_over_pass() {
        let quiz = quiz_with(&[2, 3]);
        let result = score(&quiz, &sheet(&[("q1", 2), ("q2", 3)]));
        assert_eq!(result.tier().headline(), "Perfect Score!");
    }

    #[test]
    fn all_correct_answers_score_full_marks() {
        let correct = [1, 0, 3, 2, 1, 0];
        let quiz = quiz_with(&correct);
        let answers: AnswerSheet = quiz
            .questions()
            .iter()
            .map(|q| (q.id().clone(), q.correct_option()))
            .collect();
        let result = score(&quiz, &answers);
        assert_eq!(result, ScoreResult { score: 6, total: 6, percentage: 100 });
        assert!(result.is_perfect());
    }

    #[test]
    fn every_answer_pattern_stays_in_range() {
        let correct = [0, 1, 2, 3, 0, 1, 2, 3];
        let quiz = quiz_with(&correct);
        let total = u32::try_from(correct.len()).unwrap();

        for mask in 0_u32..(1 << correct.len()) {
            let answers: AnswerSheet = quiz
                .questions()
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    let right = mask & (1 << i) != 0;
                    let opt = if right {
                        q.correct_option()
                    } else {
                        (q.correct_option() + 1) % 4
                    };
                    (q.id().clone(), opt)
                })
                .collect();
            let result = score(&quiz, &answers);

            assert_eq!(result.score, mask.count_ones(), "mask {mask:#010b}");
            assert!(result.score <= result.total);
            assert_eq!(result.total, total);
            let expected = (100.0 * f64::from(result.score) / f64::from(total)).round();
            assert_eq!(f64::from(result.percentage), expected, "mask {mask:#010b}");
            assert!(result.percentage <= 100);
        }
    }

    #[test]
    fn review_marks_each_question() {
        let quiz = quiz_with(&[1, 0]);
        let answers = sheet(&[("q1", 1)]);
        let rows = review(&quiz, &answers);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_correct);
        assert_eq!(rows[0].selected_text(), Some("b"));
        assert!(!rows[1].is_correct);
        assert_eq!(rows[1].selected, None);
        assert_eq!(rows[1].correct_text(), Some("a"));
    }
}
