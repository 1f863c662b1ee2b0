mod auth;
mod callback;
mod home;
mod notifications;
mod profile;
mod quiz;
mod quiz_list;
mod settings;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::{ForgotPasswordView, LoginView, SignUpView};
pub use callback::CallbackView;
pub use home::HomeView;
pub use notifications::NotificationsView;
pub use profile::ProfileView;
pub use quiz::QuizView;
pub use quiz_list::QuizListView;
pub use settings::SettingsView;
pub use state::{ErrorPanel, ViewError, ViewState, view_state_from_resource};
