use quiz_core::format::format_duration;
use quiz_core::model::Quiz;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: &'static str,
    pub difficulty_color: &'static str,
    pub question_count: usize,
    pub duration_str: String,
}

impl From<&Quiz> for QuizCardVm {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id().to_string(),
            title: quiz.title().to_owned(),
            description: quiz.description().to_owned(),
            category: quiz.category().to_owned(),
            difficulty: quiz.difficulty().as_str(),
            difficulty_color: quiz.difficulty().color(),
            question_count: quiz.question_count(),
            duration_str: format_duration(quiz.duration_minutes()),
        }
    }
}

impl QuizCardVm {
    /// `1 question` / `5 questions`.
    #[must_use]
    pub fn question_label(&self) -> String {
        if self.question_count == 1 {
            "1 question".to_owned()
        } else {
            format!("{} questions", self.question_count)
        }
    }
}

#[must_use]
pub fn map_quiz_cards(quizzes: &[Quiz]) -> Vec<QuizCardVm> {
    quizzes.iter().map(QuizCardVm::from).collect()
}
