use quiz_core::scoring::ResultTier;
use services::QuizSession;

/// User actions on the quiz screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    Select(usize),
    Next,
    Previous,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    /// `A`, `B`, ...
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub progress_percent: f64,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub next_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number: usize,
    pub prompt: String,
    pub selected: Option<String>,
    pub correct: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub headline: &'static str,
    pub icon: &'static str,
    pub tier: ResultTier,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub rows: Vec<ReviewRowVm>,
}

fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

/// Current question, or `None` once the session is completed.
#[must_use]
pub fn question_vm(session: &QuizSession) -> Option<QuestionVm> {
    let question = session.current_question()?;
    let selected = session.current_selection();
    let progress = session.progress();
    Some(QuestionVm {
        progress_label: progress.label(),
        progress_percent: progress.percent(),
        prompt: question.prompt().to_owned(),
        options: question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionVm {
                index,
                letter: option_letter(index),
                text: text.clone(),
                selected: selected == Some(index),
            })
            .collect(),
        can_go_back: progress.index > 0,
        can_advance: selected.is_some(),
        next_label: if session.is_last_question() {
            "Finish"
        } else {
            "Next"
        },
    })
}

/// Scored result with review rows, or `None` while the quiz is running.
#[must_use]
pub fn result_vm(session: &QuizSession) -> Option<ResultVm> {
    let result = session.result()?;
    let rows = session
        .review()
        .ok()?
        .into_iter()
        .map(|row| ReviewRowVm {
            number: row.number,
            prompt: row.question.prompt().to_owned(),
            selected: row.selected_text().map(str::to_owned),
            correct: row.correct_text().unwrap_or_default().to_owned(),
            is_correct: row.is_correct,
            explanation: row.question.explanation().to_owned(),
        })
        .collect();
    let tier = result.tier();
    Some(ResultVm {
        headline: tier.headline(),
        icon: tier.icon(),
        tier,
        score: result.score,
        total: result.total,
        percentage: result.percentage,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, QuizDraft};

    fn session() -> QuizSession {
        let quiz = QuizDraft {
            id: "q".into(),
            title: "Q".into(),
            description: String::new(),
            category: "Test".into(),
            difficulty: "Beginner".into(),
            duration: 1,
            questions: ["one", "two"]
                .iter()
                .map(|id| QuestionDraft {
                    id: (*id).into(),
                    question: format!("Question {id}"),
                    options: vec!["x".into(), "y".into(), "z".into()],
                    correct_answer: 2,
                    explanation: "z is right".into(),
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
        .validate()
        .unwrap();
        QuizSession::new(quiz).unwrap()
    }

    #[test]
    fn question_vm_tracks_selection_and_buttons() {
        let mut session = session();
        let vm = question_vm(&session).unwrap();
        assert_eq!(vm.progress_label, "Question 1 of 2");
        assert!(!vm.can_go_back);
        assert!(!vm.can_advance);
        assert_eq!(vm.next_label, "Next");
        assert_eq!(vm.options[2].letter, 'C');

        session.select_current(1).unwrap();
        session.advance().unwrap();
        let vm = question_vm(&session).unwrap();
        assert!(vm.can_go_back);
        assert_eq!(vm.next_label, "Finish");
        assert!(result_vm(&session).is_none());
    }

    #[test]
    fn result_vm_lists_review_rows() {
        let mut session = session();
        session.select_current(2).unwrap();
        session.advance().unwrap();
        session.select_current(0).unwrap();
        session.advance().unwrap();

        assert!(question_vm(&session).is_none());
        let vm = result_vm(&session).unwrap();
        assert_eq!((vm.score, vm.total, vm.percentage), (1, 2, 50));
        assert_eq!(vm.headline, "Good Effort!");
        assert!(vm.rows[0].is_correct);
        assert_eq!(vm.rows[1].selected.as_deref(), Some("x"));
        assert_eq!(vm.rows[1].correct, "z");
    }
}
