use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::app::AppSignals;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::home::StatsRow;
use crate::views::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptVm, StatsVm, map_attempts};

const RECENT_ATTEMPTS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
struct ProfileData {
    stats: StatsVm,
    attempts: Vec<AttemptVm>,
}

#[component]
pub fn ProfileView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();
    let progress = ctx.progress();
    let auth = ctx.auth();

    let mut account_error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let progress = progress.clone();
        async move {
            let records = progress.list();
            let quizzes = catalog.list_all().await?;
            Ok::<_, ViewError>(ProfileData {
                stats: progress.stats().into(),
                attempts: map_attempts(&records, &quizzes, RECENT_ATTEMPTS),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let Some(user) = (signals.user)() else {
        return rsx! {
            div { class: "page profile-page",
                h2 { "Profile" }
                p { class: "empty-state", "Sign in to see your profile and quiz history." }
                Link { class: "btn btn--primary", to: Route::Login {}, "Sign In" }
            }
        };
    };

    let on_sign_out = {
        let auth = auth.clone();
        move |_| {
            let auth = auth.clone();
            let mut user_signal = signals.user;
            spawn(async move {
                auth.sign_out().await;
                user_signal.set(None);
                navigator.replace(Route::Login {});
            });
        }
    };

    let on_delete = move |_| {
        let auth = auth.clone();
        let mut user_signal = signals.user;
        spawn(async move {
            busy.set(true);
            match auth.delete_account().await {
                Ok(()) => {
                    account_error.set(None);
                    user_signal.set(None);
                    navigator.replace(Route::Login {});
                }
                Err(err) => account_error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "page profile-page",
            div { class: "profile-card",
                if let Some(url) = user.image_url.as_deref() {
                    img { class: "avatar avatar--large", src: "{url}", alt: "{user.name}" }
                } else {
                    span { class: "avatar avatar--large", "{user.initial()}" }
                }
                h2 { "{user.name}" }
                p { class: "muted", "{user.email}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    StatsRow { stats: data.stats }
                    section { class: "profile-section",
                        h3 { "Recent Activity" }
                        if data.attempts.is_empty() {
                            p { class: "empty-state", "No quizzes taken yet." }
                        } else {
                            ul { class: "attempt-list",
                                for (i, attempt) in data.attempts.into_iter().enumerate() {
                                    li {
                                        key: "{i}",
                                        class: if attempt.perfect { "attempt attempt--perfect" } else { "attempt" },
                                        Link { to: Route::Quiz { id: attempt.quiz_id.clone() },
                                            span { class: "attempt-title", "{attempt.quiz_title}" }
                                        }
                                        span { class: "attempt-score", "{attempt.score_str} ({attempt.percentage}%)" }
                                        span { class: "attempt-date muted", "{attempt.completed_at_str}" }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }
            if let Some(message) = account_error() {
                p { class: "form-error", role: "alert", "{message}" }
            }
            div { class: "profile-actions",
                button {
                    class: "btn btn--secondary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: on_sign_out,
                    "Sign Out"
                }
                button {
                    class: "btn btn--danger",
                    r#type: "button",
                    disabled: busy(),
                    onclick: on_delete,
                    "Delete Account"
                }
            }
        }
    }
}
