use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use quiz_core::model::QuizId;
use services::QuizSession;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionVm, QuizCardVm, ResultVm, SessionIntent, question_vm, result_vm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let sessions = ctx.sessions();

    let session = use_signal(|| None::<QuizSession>);
    let error = use_signal(|| None::<ViewError>);
    let busy = use_signal(|| false);

    let sessions_for_resource = sessions.clone();
    let mut resource = use_resource(move || {
        let sessions = sessions_for_resource.clone();
        let id = id.clone();
        let mut session = session;
        let mut error = error;
        async move {
            let quiz_id = QuizId::new(id).map_err(|_| ViewError::NotFound)?;
            let started = sessions.start(&quiz_id).await?;
            session.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let dispatch_intent = use_callback(move |intent: SessionIntent| {
        let mut session = session;
        let mut error = error;
        let mut busy = busy;

        match intent {
            SessionIntent::Select(option) => {
                if let Some(current) = session.write().as_mut()
                    && let Err(err) = current.select_current(option)
                {
                    tracing::warn!(error = %err, "answer rejected");
                }
            }
            SessionIntent::Previous => {
                if let Some(current) = session.write().as_mut() {
                    let _ = current.retreat();
                }
            }
            SessionIntent::Restart => {
                if let Some(current) = session.write().as_mut()
                    && current.restart().is_ok()
                {
                    error.set(None);
                }
            }
            SessionIntent::Next => {
                if busy() {
                    return;
                }
                // Claimed before spawning so a second click in the same tick is ignored.
                busy.set(true);
                let sessions = sessions.clone();
                spawn(async move {
                    let taken = session.write().take();
                    let Some(mut local) = taken else {
                        busy.set(false);
                        error.set(Some(ViewError::Unknown));
                        return;
                    };
                    let result = sessions.advance_and_record(&mut local).await;

                    // Always put the session back so the screen stays usable after errors.
                    session.set(Some(local));
                    busy.set(false);

                    match result {
                        Ok(_) => error.set(None),
                        Err(err) => error.set(Some(err.into())),
                    }
                });
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, session);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let guard = session.read();
    let info = guard.as_ref().map(|s| QuizCardVm::from(s.quiz()));
    let question = guard.as_ref().and_then(question_vm);
    let result = guard.as_ref().and_then(result_vm);
    drop(guard);
    let in_progress = question.is_some();

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading quiz..." }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                    Link { class: "btn btn--secondary", to: Route::Quizzes {}, "Back to Quizzes" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(info) = info {
                        QuizHeader { info, in_progress }
                    }
                    if let Some(err) = error() {
                        ErrorPanel { error: err }
                    }
                    if let Some(result) = result {
                        ResultPanel { result, on_intent: dispatch_intent }
                    } else if let Some(question) = question {
                        QuestionPanel { question, busy: busy(), on_intent: dispatch_intent }
                    }
                },
            }
        }
    }
}

/// Title row with the exit confirmation and the quiz info panel.
#[component]
fn QuizHeader(info: QuizCardVm, in_progress: bool) -> Element {
    let navigator = use_navigator();
    let mut show_exit = use_signal(|| false);
    let mut show_info = use_signal(|| false);

    rsx! {
        div { class: "quiz-header",
            button {
                class: "btn btn--secondary",
                r#type: "button",
                onclick: move |_| {
                    if in_progress {
                        show_exit.set(true);
                    } else {
                        navigator.go_back();
                    }
                },
                "Exit Quiz"
            }
            h2 { class: "quiz-title", "{info.title}" }
            button {
                class: "btn btn--secondary",
                r#type: "button",
                "aria-label": "Quiz Info",
                onclick: move |_| show_info.set(!show_info()),
                "Info"
            }
        }
        p { class: "quiz-meta",
            "{info.category} · {info.difficulty} · Estimated Time: {info.duration_str}"
        }
        if show_info() {
            div { class: "quiz-info",
                p { "Category: {info.category}" }
                p { "Difficulty: {info.difficulty}" }
                p { "Estimated Time: {info.duration_str}" }
            }
        }
        if show_exit() {
            div {
                class: "modal-overlay",
                onclick: move |_| show_exit.set(false),
                div {
                    class: "modal",
                    onclick: move |evt| evt.stop_propagation(),
                    h3 { class: "modal-title", "Exit Quiz" }
                    p { class: "modal-body",
                        "Are you sure you want to exit? Your progress will not be saved."
                    }
                    div { class: "modal-actions",
                        button {
                            class: "btn btn--secondary",
                            r#type: "button",
                            onclick: move |_| show_exit.set(false),
                            "Cancel"
                        }
                        button {
                            class: "btn btn--danger",
                            r#type: "button",
                            onclick: move |_| {
                                show_exit.set(false);
                                navigator.go_back();
                            },
                            "Exit"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionPanel(question: QuestionVm, busy: bool, on_intent: Callback<SessionIntent>) -> Element {
    let next_disabled = busy || !question.can_advance;
    rsx! {
        div { class: "question-panel",
            div { class: "progress",
                span { class: "progress-label", "{question.progress_label}" }
                div { class: "progress-track",
                    div {
                        class: "progress-fill",
                        style: "width: {question.progress_percent:.0}%",
                    }
                }
            }
            p { class: "question-prompt", "{question.prompt}" }
            ul { class: "options",
                for option in question.options {
                    li { key: "{option.index}",
                        button {
                            class: if option.selected { "option option--selected" } else { "option" },
                            r#type: "button",
                            onclick: move |_| on_intent.call(SessionIntent::Select(option.index)),
                            span { class: "option-letter", "{option.letter}" }
                            span { class: "option-text", "{option.text}" }
                        }
                    }
                }
            }
            div { class: "question-actions",
                button {
                    class: "btn btn--secondary",
                    r#type: "button",
                    disabled: !question.can_go_back,
                    onclick: move |_| on_intent.call(SessionIntent::Previous),
                    "Previous"
                }
                button {
                    class: "btn btn--primary",
                    r#type: "button",
                    disabled: next_disabled,
                    onclick: move |_| on_intent.call(SessionIntent::Next),
                    "{question.next_label}"
                }
            }
        }
    }
}

#[component]
fn ResultPanel(result: ResultVm, on_intent: Callback<SessionIntent>) -> Element {
    rsx! {
        div { class: "result-panel",
            div { class: "result-summary",
                span { class: "result-icon", "data-icon": result.icon }
                h3 { "{result.headline}" }
                p { class: "result-score", "{result.score}/{result.total}" }
                p { class: "result-percentage", "{result.percentage}%" }
            }
            h4 { "Review Answers" }
            ul { class: "review-list",
                for row in result.rows {
                    li {
                        key: "{row.number}",
                        class: if row.is_correct { "review-row review-row--correct" } else { "review-row review-row--wrong" },
                        p { class: "review-prompt", "{row.number}. {row.prompt}" }
                        p {
                            "Your answer: "
                            {row.selected.clone().unwrap_or_else(|| "Not answered".to_owned())}
                        }
                        if !row.is_correct {
                            p { "Correct answer: {row.correct}" }
                        }
                        if !row.explanation.is_empty() {
                            p { class: "review-explanation", "{row.explanation}" }
                        }
                    }
                }
            }
            div { class: "result-actions",
                button {
                    class: "btn btn--primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(SessionIntent::Restart),
                    "Try Again"
                }
                Link { class: "btn btn--secondary", to: Route::Quizzes {}, "Back to Quizzes" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SessionIntent>>>>,
    session: Rc<RefCell<Option<Signal<Option<QuizSession>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<SessionIntent>,
        session: Signal<Option<QuizSession>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
    }

    pub(crate) fn dispatch(&self) -> Callback<SessionIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<Option<QuizSession>> {
        (*self.session.borrow()).expect("quiz session registered")
    }
}
