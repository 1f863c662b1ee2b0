use dioxus::prelude::*;
use services::{CatalogError, NotificationError, SessionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    EmptyQuiz,
    Unavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NotFound => "Quiz not found",
            ViewError::EmptyQuiz => "This quiz has no questions yet.",
            ViewError::Unavailable => "Could not load data. Check your connection and try again.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ViewError::NotFound,
            CatalogError::Storage(_) => ViewError::Unavailable,
            _ => ViewError::Unknown,
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ViewError::NotFound,
            SessionError::EmptyQuiz(_) => ViewError::EmptyQuiz,
            SessionError::Catalog(inner) => inner.into(),
            _ => ViewError::Unknown,
        }
    }
}

impl From<NotificationError> for ViewError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Storage(_) => ViewError::Unavailable,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Error text with a retry button.
#[component]
pub fn ErrorPanel(error: ViewError, on_retry: Option<EventHandler<()>>) -> Element {
    rsx! {
        div { class: "error-panel", role: "alert",
            p { "{error.message()}" }
            if let Some(on_retry) = on_retry {
                button {
                    class: "btn btn--secondary",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Retry"
                }
            }
        }
    }
}
