use std::str::FromStr;

use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};
use quiz_core::redirect::{SIGNED_IN_ROUTE, SIGNED_OUT_ROUTE};

use crate::app::AppSignals;
use crate::views::{
    CallbackView, ForgotPasswordView, HomeView, LoginView, NotificationsView, ProfileView,
    QuizListView, QuizView, SettingsView, SignUpView,
};

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quizzes", QuizListView)] Quizzes {},
        #[route("/quiz/:id", QuizView)] Quiz { id: String },
        #[route("/notifications", NotificationsView)] Notifications {},
        #[route("/profile", ProfileView)] Profile {},
        #[route("/settings", SettingsView)] Settings {},
    #[end_layout]
    #[route("/login", LoginView)] Login {},
    #[route("/signup", SignUpView)] SignUp {},
    #[route("/forgot-password", ForgotPasswordView)] ForgotPassword {},
    #[route("/callback?:..query", CallbackView)] Callback { query: String },
}

/// Map a redirect target to a route. The group paths used by OAuth redirects
/// resolve to their screens; anything else must be a known route path.
#[must_use]
pub fn route_for_path(path: &str) -> Option<Route> {
    match path {
        SIGNED_IN_ROUTE | "/(tabs)/" | "/(tabs)/index" => Some(Route::Home {}),
        SIGNED_OUT_ROUTE => Some(Route::Login {}),
        "/(auth)/signup" => Some(Route::SignUp {}),
        "/(tabs)/profile" => Some(Route::Profile {}),
        "/(tabs)/notifications" => Some(Route::Notifications {}),
        "/(tabs)/settings" => Some(Route::Settings {}),
        other => Route::from_str(other).ok(),
    }
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let signals = use_context::<AppSignals>();
    let user = (signals.user)();

    rsx! {
        nav { class: "sidebar",
            h1 { "QuizApp" }
            ul {
                li { Link { to: Route::Home {}, "Home" } }
                li { Link { to: Route::Quizzes {}, "Quizzes" } }
                li { Link { to: Route::Notifications {}, "Notifications" } }
                li { Link { to: Route::Profile {}, "Profile" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
            div { class: "sidebar-account",
                match user {
                    Some(user) => rsx! {
                        span { class: "avatar", "{user.initial()}" }
                        span { class: "sidebar-user", "{user.name}" }
                    },
                    None => rsx! {
                        Link { to: Route::Login {}, "Sign In" }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_paths_map_to_screens() {
        assert_eq!(route_for_path("/(tabs)"), Some(Route::Home {}));
        assert_eq!(route_for_path("/(auth)/login"), Some(Route::Login {}));
        assert_eq!(route_for_path("/settings"), Some(Route::Settings {}));
        assert_eq!(
            route_for_path("/quiz/rust-basics"),
            Some(Route::Quiz {
                id: "rust-basics".into()
            })
        );
    }
}
