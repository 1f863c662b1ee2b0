use dioxus::prelude::*;
use dioxus_router::Router;
use quiz_core::model::{ThemePreference, User};

use crate::context::AppContext;
use crate::routes::Route;

/// Reactive copies of the persisted theme and signed-in user, shared by all views.
#[derive(Clone, Copy)]
pub struct AppSignals {
    pub theme: Signal<ThemePreference>,
    pub user: Signal<Option<User>>,
}

/// Provide `AppSignals`. The theme comes from local state; the user is only
/// set once the identity provider confirms a session.
pub fn use_app_signals_provider() -> AppSignals {
    let ctx = use_context::<AppContext>();
    let signals = use_context_provider(|| AppSignals {
        theme: Signal::new(ctx.preferences().theme()),
        user: Signal::new(None),
    });
    let auth = ctx.auth();
    use_future(move || {
        let auth = auth.clone();
        let mut user = signals.user;
        async move {
            user.set(auth.session_user().await);
        }
    });
    signals
}

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_app_signals_provider();
    let dark = (signals.theme)().resolve_dark(ctx.system_prefers_dark());

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. Per-route titles are rendered inside the content pane.
        document::Title { "QuizApp" }

        div { class: if dark { "app-root theme-dark" } else { "app-root" },
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
