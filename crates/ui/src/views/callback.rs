use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::redirect::{AUTO_NAVIGATION_DELAY_MS, CallbackParams};

use crate::app::AppSignals;
use crate::context::AppContext;
use crate::routes::{Route, route_for_path};

/// Landing screen for OAuth redirects. Shows the provider error, if any, and
/// moves on to the resolved destination after a short pause.
#[component]
pub fn CallbackView(query: String) -> Element {
    let ctx = use_context::<AppContext>();
    let signals = use_context::<AppSignals>();
    let navigator = use_navigator();
    let auth = ctx.auth();
    let params = CallbackParams::from_query(&query);
    let error_message = params.error_message().map(str::to_owned);

    use_future(move || {
        let auth = auth.clone();
        let params = params.clone();
        let mut user = signals.user;
        async move {
            let destination = auth.oauth_destination(&params).await;
            tokio::time::sleep(Duration::from_millis(AUTO_NAVIGATION_DELAY_MS)).await;
            user.set(auth.session_user().await);
            let route = route_for_path(&destination).unwrap_or_else(|| {
                tracing::warn!(%destination, "unknown redirect target");
                Route::Login {}
            });
            navigator.replace(route);
        }
    });

    rsx! {
        div { class: "auth-page callback-page",
            match error_message {
                Some(message) => rsx! {
                    h2 { "Sign in failed" }
                    p { class: "form-error", role: "alert", "{message}" }
                },
                None => rsx! {
                    div { class: "spinner" }
                    p { "Completing sign in..." }
                },
            }
        }
    }
}
