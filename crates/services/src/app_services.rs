use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use storage::dataset::{bundled_dataset, load_dataset_file};
use storage::repository::{QuizRepository, Storage};
use storage::seed::seed_quizzes;

use crate::Clock;
use crate::auth::{AuthService, IdentityProvider, LocalIdentityProvider, StorageUserDataStore};
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::local_state::LocalStateStore;
use crate::notification_service::NotificationService;
use crate::preferences_service::PreferencesService;
use crate::progress_service::ProgressStore;
use crate::remote_catalog::{HttpQuizRepository, RemoteCatalogConfig};
use crate::sessions::QuizSessionService;

const REMOTE_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Assembles app-facing services over one `Storage` and identity provider.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    catalog: Arc<CatalogService>,
    sessions: Arc<QuizSessionService>,
    progress: Arc<ProgressStore>,
    preferences: Arc<PreferencesService>,
    auth: Arc<AuthService>,
    notifications: Arc<NotificationService>,
}

impl AppServices {
    /// Wire services over existing storage; loads the local state blob.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let state = Arc::new(LocalStateStore::load(Arc::clone(&storage.kv)).await);
        let catalog = CatalogService::new(Arc::clone(&storage.quizzes));
        let progress = ProgressStore::new(Arc::clone(&state));
        let preferences = PreferencesService::new(Arc::clone(&state));
        let user_data = Arc::new(StorageUserDataStore::new(
            Arc::clone(&storage.kv),
            Arc::clone(&storage.notifications),
        ));
        let auth = AuthService::new(identity, user_data, preferences.clone());
        let sessions = QuizSessionService::new(clock, catalog.clone(), progress.clone());
        let notifications = NotificationService::new(clock, Arc::clone(&storage.notifications));

        Self {
            clock,
            catalog: Arc::new(catalog),
            sessions: Arc::new(sessions),
            progress: Arc::new(progress),
            preferences: Arc::new(preferences),
            auth: Arc::new(auth),
            notifications: Arc::new(notifications),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// An empty catalog is seeded from `dataset`, or from the bundled dataset
    /// when no file is given. With `remote` set, quizzes are read over HTTP
    /// instead of from the database.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, seeding or the
    /// HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        dataset: Option<&Path>,
        remote: Option<RemoteCatalogConfig>,
    ) -> Result<Self, AppServicesError> {
        let mut storage = Storage::sqlite(db_url).await?;
        ensure_catalog(storage.quizzes.as_ref(), clock, dataset).await?;

        if let Some(config) = remote {
            info!(base_url = %config.base_url, "using remote quiz catalog");
            let repo = HttpQuizRepository::with_timeout(config, REMOTE_CATALOG_TIMEOUT)?;
            storage.quizzes = Arc::new(repo);
        }

        let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new());
        Ok(Self::from_storage(storage, clock, identity).await)
    }

    /// In-memory services over the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Dataset` if the bundled dataset is invalid.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::in_memory_with(bundled_dataset()?);
        let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new());
        Ok(Self::from_storage(storage, clock, identity).await)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
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

async fn ensure_catalog(
    quizzes: &dyn QuizRepository,
    clock: Clock,
    dataset: Option<&Path>,
) -> Result<(), AppServicesError> {
    if quizzes.count_quizzes().await? > 0 {
        return Ok(());
    }
    let dataset = match dataset {
        Some(path) => load_dataset_file(path)?,
        None => bundled_dataset()?,
    };
    let outcome = seed_quizzes(quizzes, &dataset, clock.now()).await?;
    info!("{}", outcome.message());
    Ok(())
}
