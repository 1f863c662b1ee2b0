mod answers;
mod ids;
mod notification;
mod progress;
mod quiz;
mod settings;
mod user;

pub use answers::AnswerSheet;
pub use ids::{NotificationId, ParseIdError, QuestionId, QuizId, UserId};
pub use notification::{Notification, NotificationKind, badge_label};
pub use progress::{ProgressRecord, ProgressStats};
pub use quiz::{Difficulty, Question, QuestionDraft, Quiz, QuizDraft, QuizError};
pub use settings::{
    SettingAction, SettingEntry, SettingToggle, SettingsSection, ThemePreference, settings_sections,
};
pub use user::User;
