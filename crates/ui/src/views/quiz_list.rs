use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::Quiz;
use services::catalog_service::{categories_of, filter_quizzes};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, map_quiz_cards};

#[component]
pub fn QuizListView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let mut search = use_signal(String::new);
    let category = use_signal(|| None::<String>);

    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        async move { Ok::<Vec<Quiz>, ViewError>(catalog.list_all().await?) }
    });
    let state = view_state_from_resource(&resource);

    let body = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading quizzes..." }
        },
        ViewState::Ready(quizzes) => {
            let categories = categories_of(&quizzes);
            let visible = filter_quizzes(quizzes, &search(), category().as_deref());
            let cards = map_quiz_cards(&visible);
            rsx! {
                div { class: "category-chips",
                    CategoryChip { label: "All".to_string(), value: None, selected: category }
                    for name in categories {
                        CategoryChip {
                            key: "{name}",
                            label: name.clone(),
                            value: Some(name),
                            selected: category,
                        }
                    }
                }
                if cards.is_empty() {
                    p { class: "empty-state", "No quizzes found" }
                } else {
                    ul { class: "quiz-list",
                        for card in cards {
                            QuizCard { key: "{card.id}", card }
                        }
                    }
                }
            }
        }
        ViewState::Error(err) => rsx! {
            ErrorPanel { error: err, on_retry: move |()| resource.restart() }
        },
    };

    rsx! {
        div { class: "page",
            h2 { "All Quizzes" }
            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Search quizzes...",
                value: "{search}",
                oninput: move |evt| search.set(evt.value()),
            }
            {body}
        }
    }
}

/// Category filter button; `None` is the "All" chip.
#[component]
fn CategoryChip(label: String, value: Option<String>, mut selected: Signal<Option<String>>) -> Element {
    let active = *selected.read() == value;
    rsx! {
        button {
            class: if active { "chip chip--active" } else { "chip" },
            r#type: "button",
            onclick: move |_| selected.set(value.clone()),
            "{label}"
        }
    }
}

#[component]
pub(crate) fn QuizCard(card: QuizCardVm) -> Element {
    rsx! {
        li { class: "quiz-card",
            Link { class: "quiz-card__link", to: Route::Quiz { id: card.id.clone() },
                div { class: "quiz-card__header",
                    span { class: "quiz-card__category", "{card.category}" }
                    span {
                        class: "quiz-card__difficulty",
                        style: "color: {card.difficulty_color}",
                        "{card.difficulty}"
                    }
                }
                h3 { class: "quiz-card__title", "{card.title}" }
                if !card.description.is_empty() {
                    p { class: "quiz-card__description", "{card.description}" }
                }
                p { class: "quiz-card__meta",
                    span { "{card.question_label()}" }
                    span { " · {card.duration_str}" }
                }
            }
        }
    }
}
