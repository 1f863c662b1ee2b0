use std::sync::Arc;

use async_trait::async_trait;

use quiz_core::model::{User, UserId};
use storage::repository::{KeyValueStore, NotificationRepository, StorageError};

/// Per-user documents held by the remote store.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    /// Create or refresh the user's profile document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError>;

    /// Remove everything stored for `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any delete fails.
    async fn delete_user_data(&self, user: &UserId) -> Result<(), StorageError>;
}

/// `UserDataStore` over the local repositories: profiles live in the
/// key-value table under `users/{id}`.
#[derive(Clone)]
pub struct StorageUserDataStore {
    kv: Arc<dyn KeyValueStore>,
    notifications: Arc<dyn NotificationRepository>,
}

impl StorageUserDataStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { kv, notifications }
    }

    fn key(user: &UserId) -> String {
        format!("users/{user}")
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the read fails or the stored profile is corrupt.
    pub async fn get_user(&self, user: &UserId) -> Result<Option<User>, StorageError> {
        self.kv
            .get(&Self::key(user))
            .await?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .transpose()
    }
}

#[async_trait]
impl UserDataStore for StorageUserDataStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(user).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&Self::key(&user.id), &raw).await
    }

    async fn delete_user_data(&self, user: &UserId) -> Result<(), StorageError> {
        self.notifications.delete_for_user(user).await?;
        self.kv.remove(&Self::key(user)).await
    }
}
