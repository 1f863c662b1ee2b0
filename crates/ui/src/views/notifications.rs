use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::NotificationId;

use crate::app::AppSignals;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{NotificationVm, map_notifications};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NotificationAction {
    Open(u64),
    Delete(u64),
    MarkAllRead,
}

#[component]
pub fn NotificationsView() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let notifications = ctx.notifications();
    let mut action_error = use_signal(|| None::<ViewError>);

    let service = notifications.clone();
    let mut resource = use_resource(move || {
        let service = service.clone();
        let user = (signals.user)();
        async move {
            let Some(user) = user else {
                return Ok::<_, ViewError>(None);
            };
            let items = service.feed(&user.id).await?;
            let badge = service.badge(&user.id).await?;
            Ok(Some((map_notifications(&items), badge)))
        }
    });
    let state = view_state_from_resource(&resource);

    let on_action = use_callback(move |action: NotificationAction| {
        let service = notifications.clone();
        let user = (signals.user)();
        spawn(async move {
            let result = match action {
                NotificationAction::Open(id) => service.mark_read(NotificationId::new(id)).await,
                NotificationAction::Delete(id) => service.delete(NotificationId::new(id)).await,
                NotificationAction::MarkAllRead => match user {
                    Some(user) => service.mark_all_read(&user.id).await.map(|_| ()),
                    None => Ok(()),
                },
            };
            match result {
                Ok(()) => action_error.set(None),
                Err(err) => action_error.set(Some(err.into())),
            }
            resource.restart();
        });
    });

    let body = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { "Loading notifications..." }
        },
        ViewState::Ready(None) => rsx! {
            p { class: "empty-state", "Sign in to see your notifications." }
            Link { class: "btn btn--primary", to: Route::Login {}, "Sign In" }
        },
        ViewState::Ready(Some((items, badge))) => rsx! {
            div { class: "section-header",
                if !badge.is_empty() {
                    span { class: "badge", "{badge} unread" }
                }
                button {
                    class: "btn btn--secondary",
                    r#type: "button",
                    disabled: badge.is_empty(),
                    onclick: move |_| on_action.call(NotificationAction::MarkAllRead),
                    "Mark all as read"
                }
            }
            if items.is_empty() {
                p { class: "empty-state", "No notifications yet" }
            } else {
                ul { class: "notification-list",
                    for item in items {
                        NotificationRow { key: "{item.id}", item, on_action }
                    }
                }
            }
        },
        ViewState::Error(err) => rsx! {
            ErrorPanel { error: err, on_retry: move |()| resource.restart() }
        },
    };

    rsx! {
        div { class: "page notifications-page",
            h2 { "Notifications" }
            if let Some(err) = action_error() {
                ErrorPanel { error: err }
            }
            {body}
        }
    }
}

#[component]
fn NotificationRow(item: NotificationVm, on_action: Callback<NotificationAction>) -> Element {
    let id = item.id;
    rsx! {
        li { class: if item.unread { "notification notification--unread" } else { "notification" },
            button {
                class: "notification-body",
                r#type: "button",
                onclick: move |_| on_action.call(NotificationAction::Open(id)),
                span { class: "notification-icon", "data-icon": item.icon }
                div {
                    p { class: "notification-title", "{item.title}" }
                    if !item.message.is_empty() {
                        p { class: "notification-message", "{item.message}" }
                    }
                    span { class: "notification-time muted", "{item.time_label}" }
                }
            }
            button {
                class: "btn btn--icon",
                r#type: "button",
                "aria-label": "Delete notification",
                onclick: move |_| on_action.call(NotificationAction::Delete(id)),
                "×"
            }
        }
    }
}
