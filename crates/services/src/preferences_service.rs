use std::sync::Arc;

use tracing::info;

use quiz_core::model::{SettingsSection, ThemePreference, User, settings_sections};

use crate::local_state::LocalStateStore;

/// Theme and cached user, persisted in the local state blob.
#[derive(Clone)]
pub struct PreferencesService {
    state: Arc<LocalStateStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(state: Arc<LocalStateStore>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.state.read(|s| s.theme)
    }

    pub async fn set_theme(&self, theme: ThemePreference) {
        self.state.update(|s| s.theme = theme).await;
    }

    #[must_use]
    pub fn effective_dark_mode(&self, system_is_dark: bool) -> bool {
        self.theme().resolve_dark(system_is_dark)
    }

    /// Settings screen model with the dark-mode toggle reflecting the current theme.
    #[must_use]
    pub fn settings_sections(&self, system_is_dark: bool) -> Vec<SettingsSection> {
        settings_sections(self.effective_dark_mode(system_is_dark))
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.read(|s| s.user.clone())
    }

    pub async fn set_user(&self, user: Option<User>) {
        self.state.update(|s| s.user = user).await;
    }

    /// Forget the cached user and drop the persisted blob.
    pub async fn logout(&self) {
        self.state.clear_user_and_remove().await;
        info!("signed out locally");
    }
}
