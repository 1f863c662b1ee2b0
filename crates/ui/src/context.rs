use std::sync::Arc;

use services::{
    AuthService, CatalogService, Clock, NotificationService, PreferencesService, ProgressStore,
    QuizSessionService,
};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;

    fn catalog(&self) -> Arc<CatalogService>;
    fn sessions(&self) -> Arc<QuizSessionService>;
    fn progress(&self) -> Arc<ProgressStore>;
    fn preferences(&self) -> Arc<PreferencesService>;
    fn auth(&self) -> Arc<AuthService>;
    fn notifications(&self) -> Arc<NotificationService>;

    /// Whether the desktop reports a dark system theme.
    fn system_prefers_dark(&self) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    system_prefers_dark: bool,

    catalog: Arc<CatalogService>,
    sessions: Arc<QuizSessionService>,
    progress: Arc<ProgressStore>,
    preferences: Arc<PreferencesService>,
    auth: Arc<AuthService>,
    notifications: Arc<NotificationService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            system_prefers_dark: app.system_prefers_dark(),
            catalog: app.catalog(),
            sessions: app.sessions(),
            progress: app.progress(),
            preferences: app.preferences(),
            auth: app.auth(),
            notifications: app.notifications(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn system_prefers_dark(&self) -> bool {
        self.system_prefers_dark
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn notifications(&self) -> Arc<NotificationService> {
        Arc::clone(&self.notifications)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
