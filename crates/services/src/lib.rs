#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod catalog_service;
pub mod error;
pub mod local_state;
pub mod notification_service;
pub mod preferences_service;
pub mod progress_service;
pub mod remote_catalog;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use auth::{AuthService, IdentityProvider, LocalIdentityProvider, SignUpStep};
pub use catalog_service::{CatalogService, RECOMMENDED_LIMIT};
pub use error::{
    AppServicesError, AuthError, CatalogError, NotificationError, ProviderError, SessionError,
    ValidationError,
};
pub use local_state::{LocalState, LocalStateStore};
pub use notification_service::{NotificationItem, NotificationService};
pub use preferences_service::PreferencesService;
pub use progress_service::ProgressStore;
pub use remote_catalog::{HttpQuizRepository, RemoteCatalogConfig};
pub use sessions::{Advance, QuizSession, QuizSessionService, SessionProgress, SessionState};
