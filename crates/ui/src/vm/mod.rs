mod notification_vm;
mod progress_vm;
mod quiz_vm;
mod session_vm;
mod time_fmt;

pub use notification_vm::{NotificationVm, map_notifications};
pub use progress_vm::{AttemptVm, StatsVm, map_attempts};
pub use quiz_vm::{QuizCardVm, map_quiz_cards};
pub use session_vm::{
    OptionVm, QuestionVm, ResultVm, ReviewRowVm, SessionIntent, question_vm, result_vm,
};
pub use time_fmt::format_datetime;
