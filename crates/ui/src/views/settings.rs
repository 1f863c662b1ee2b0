use dioxus::prelude::*;
use quiz_core::model::{SettingAction, SettingEntry, ThemePreference, settings_sections};

use crate::app::AppSignals;
use crate::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClearState {
    Idle,
    Clearing,
    Cleared,
}

fn action_note(action: SettingAction) -> Option<&'static str> {
    match action {
        SettingAction::About => Some(concat!(
            "QuizApp ",
            env!("CARGO_PKG_VERSION"),
            ". Practice with short multiple-choice quizzes."
        )),
        SettingAction::PrivacyPolicy => {
            Some("Quiz progress and preferences are stored on this device only.")
        }
        SettingAction::Terms => Some("QuizApp is provided as is, without warranty of any kind."),
        SettingAction::ClearProgress => None,
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let preferences = ctx.preferences();
    let progress = ctx.progress();

    let mut note = use_signal(|| None::<&'static str>);
    let mut show_clear_modal = use_signal(|| false);
    let mut clear_state = use_signal(|| ClearState::Idle);

    let dark = (signals.theme)().resolve_dark(ctx.system_prefers_dark());
    let sections = settings_sections(dark);

    let on_toggle = use_callback(move |enabled: bool| {
        let preferences = preferences.clone();
        let mut theme = signals.theme;
        spawn(async move {
            let next = ThemePreference::from_dark_toggle(enabled);
            preferences.set_theme(next).await;
            theme.set(next);
        });
    });

    let on_action = use_callback(move |action: SettingAction| {
        if action == SettingAction::ClearProgress {
            clear_state.set(ClearState::Idle);
            show_clear_modal.set(true);
        } else {
            note.set(action_note(action));
        }
    });

    rsx! {
        div { class: "page settings-page",
            h2 { "Settings" }
            for section in sections {
                section { key: "{section.title}", class: "settings-section",
                    h3 { class: "settings-section-title", "{section.title}" }
                    ul { class: "settings-list",
                        for entry in section.entries {
                            SettingRow { key: "{entry.label()}", entry, on_toggle, on_action }
                        }
                    }
                }
            }
            if let Some(text) = note() {
                p { class: "settings-note", "{text}" }
            }
            if clear_state() == ClearState::Cleared {
                p { class: "settings-note", "Progress cleared." }
            }
            if show_clear_modal() {
                div {
                    class: "modal-overlay",
                    onclick: move |_| show_clear_modal.set(false),
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Clear all progress?" }
                        p { class: "modal-body",
                            "This removes every recorded quiz attempt. This cannot be undone."
                        }
                        div { class: "modal-actions",
                            button {
                                class: "btn btn--secondary",
                                r#type: "button",
                                onclick: move |_| show_clear_modal.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn--danger",
                                r#type: "button",
                                disabled: clear_state() == ClearState::Clearing,
                                onclick: move |_| {
                                    let progress = progress.clone();
                                    spawn(async move {
                                        clear_state.set(ClearState::Clearing);
                                        progress.clear().await;
                                        clear_state.set(ClearState::Cleared);
                                        show_clear_modal.set(false);
                                    });
                                },
                                "Clear"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SettingRow(
    entry: SettingEntry,
    on_toggle: Callback<bool>,
    on_action: Callback<SettingAction>,
) -> Element {
    let icon = entry.icon();
    let label = entry.label();
    match entry {
        SettingEntry::Toggle { value, .. } => rsx! {
            li { class: "settings-row",
                span { class: "settings-icon", "data-icon": icon }
                label { class: "settings-label",
                    "{label}"
                    input {
                        r#type: "checkbox",
                        checked: value,
                        onchange: move |evt| on_toggle.call(evt.checked()),
                    }
                }
            }
        },
        SettingEntry::Action { id, destructive, .. } => rsx! {
            li { class: "settings-row",
                button {
                    class: if destructive { "settings-action settings-action--danger" } else { "settings-action" },
                    r#type: "button",
                    onclick: move |_| on_action.call(id),
                    span { class: "settings-icon", "data-icon": icon }
                    span { class: "settings-label", "{label}" }
                }
            }
        },
    }
}
