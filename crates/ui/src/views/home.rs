use dioxus::prelude::*;
use dioxus_router::Link;
use services::RECOMMENDED_LIMIT;

use crate::app::AppSignals;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::quiz_list::QuizCard;
use crate::views::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, StatsVm, map_quiz_cards};

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    stats: StatsVm,
    recommended: Vec<QuizCardVm>,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let catalog = ctx.catalog();
    let progress = ctx.progress();

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let progress = progress.clone();
        async move {
            let records = progress.list();
            let recommended = catalog.recommended(&records, RECOMMENDED_LIMIT).await?;
            Ok::<_, ViewError>(HomeData {
                stats: progress.stats().into(),
                recommended: map_quiz_cards(&recommended),
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let greeting = match (signals.user)() {
        Some(user) => format!("Welcome back, {}!", user.name),
        None => "Welcome!".to_owned(),
    };

    rsx! {
        div { class: "page home-page",
            header { class: "home-header",
                h2 { "{greeting}" }
                p { class: "muted", "Ready to test your knowledge?" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    StatsRow { stats: data.stats }
                    section { class: "home-section",
                        div { class: "section-header",
                            h3 { "Recommended for You" }
                            Link { to: Route::Quizzes {}, "See All" }
                        }
                        if data.recommended.is_empty() {
                            p { class: "empty-state", "You've mastered every quiz. Nice work!" }
                        } else {
                            ul { class: "quiz-list",
                                for card in data.recommended {
                                    QuizCard { key: "{card.id}", card }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    ErrorPanel { error: err, on_retry: move |()| resource.restart() }
                },
            }
        }
    }
}

#[component]
pub(crate) fn StatsRow(stats: StatsVm) -> Element {
    rsx! {
        div { class: "stats-row",
            div { class: "stat-card",
                span { class: "stat-value", "{stats.total_attempts}" }
                span { class: "stat-label", "Quizzes Taken" }
            }
            div { class: "stat-card",
                span { class: "stat-value", "{stats.average_percentage}%" }
                span { class: "stat-label", "Average Score" }
            }
            div { class: "stat-card",
                span { class: "stat-value", "{stats.perfect_scores}" }
                span { class: "stat-label", "Perfect Scores" }
            }
        }
    }
}
