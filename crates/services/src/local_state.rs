//! The single persisted application blob: signed-in user, theme and quiz history.
//!
//! `LocalStateStore` is shared by the progress store and the preferences
//! service. Every mutation updates memory first and then writes the whole
//! blob through the injected `KeyValueStore`. A failed write is logged and
//! the in-memory state stays authoritative.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quiz_core::model::{ProgressRecord, ThemePreference, User};
use storage::repository::KeyValueStore;

/// Key of the blob in local durable storage.
pub const LOCAL_STATE_KEY: &str = "authStore";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub theme: ThemePreference,
    /// Most recent attempt first.
    #[serde(default)]
    pub quiz_progress: Vec<ProgressRecord>,
}

pub struct LocalStateStore {
    kv: Arc<dyn KeyValueStore>,
    state: Mutex<LocalState>,
}

impl LocalStateStore {
    /// Store starting from an empty state; nothing is read from `kv`.
    #[must_use]
    pub fn empty(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            state: Mutex::new(LocalState::default()),
        }
    }

    /// Load the persisted blob. Missing, unreadable or corrupt data yields an empty state.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let state = match kv.get(LOCAL_STATE_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "discarding corrupt local state");
                LocalState::default()
            }),
            Ok(None) => LocalState::default(),
            Err(err) => {
                warn!(error = %err, "failed to load local state");
                LocalState::default()
            }
        };
        debug!(
            records = state.quiz_progress.len(),
            signed_in = state.user.is_some(),
            "local state loaded"
        );
        Self {
            kv,
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> LocalState {
        self.lock().clone()
    }

    /// Read a projection of the state without cloning all of it.
    pub fn read<T>(&self, f: impl FnOnce(&LocalState) -> T) -> T {
        f(&self.lock())
    }

    /// Apply `f` under the lock, then persist the resulting blob.
    ///
    /// Returns whatever `f` returns; persistence failures are logged only.
    pub async fn update<T>(&self, f: impl FnOnce(&mut LocalState) -> T) -> T {
        let (out, encoded) = {
            let mut state = self.lock();
            let out = f(&mut state);
            (out, serde_json::to_string(&*state))
        };
        match encoded {
            Ok(raw) => {
                if let Err(err) = self.kv.set(LOCAL_STATE_KEY, &raw).await {
                    warn!(error = %err, "failed to persist local state");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode local state"),
        }
        out
    }

    /// Clear the user in memory and drop the persisted blob.
    ///
    /// Theme and progress stay in memory until the process exits.
    pub async fn clear_user_and_remove(&self) {
        self.lock().user = None;
        if let Err(err) = self.kv.remove(LOCAL_STATE_KEY).await {
            warn!(error = %err, "failed to remove local state");
        }
    }
}
