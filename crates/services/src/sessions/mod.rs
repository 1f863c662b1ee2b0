mod progress;
mod session;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{SessionError, ValidationError};
pub use progress::SessionProgress;
pub use session::{Advance, QuizSession, SessionState};
pub use workflow::QuizSessionService;
