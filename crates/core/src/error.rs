use thiserror::Error;

use crate::model::{ParseIdError, QuizError};
use crate::redirect::RedirectError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Redirect(#[from] RedirectError),
}
