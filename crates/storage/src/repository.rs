use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Notification, NotificationId, NotificationKind, Quiz, QuizId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

/// Catalog source for quizzes. Ordering of `list_quizzes` is the catalog order.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// All quizzes in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or a stored quiz is invalid.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError>;

    /// Insert or replace a quiz, stamping `at` as its update time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn count_quizzes(&self) -> Result<usize, StorageError>;

    /// Remove every quiz and report how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn delete_all_quizzes(&self) -> Result<usize, StorageError>;
}

/// New notification before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: i64,
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a new unread notification.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationId, StorageError>;

    /// Notifications for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the notification does not exist.
    async fn mark_read(&self, id: NotificationId) -> Result<(), StorageError>;

    /// Mark every unread notification for `user` as read; returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn mark_all_read(&self, user: &UserId) -> Result<usize, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the notification does not exist.
    async fn delete_notification(&self, id: NotificationId) -> Result<(), StorageError>;

    /// Remove all remote data held for `user`; returns how many rows were deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_for_user(&self, user: &UserId) -> Result<usize, StorageError>;
}

/// Local durable key/value storage for small serialized blobs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct NotificationTable {
    next_id: u64,
    rows: Vec<Notification>,
}

/// Simple in-memory repository implementation for tests, prototyping and the bundled dataset.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<Vec<Quiz>>>,
    notifications: Arc<Mutex<NotificationTable>>,
    kv: Arc<Mutex<HashMap<String, String>>>,
}

fn lock_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `quizzes` in the given order.
    #[must_use]
    pub fn with_quizzes(quizzes: Vec<Quiz>) -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(quizzes)),
            ..Self::default()
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        guard
            .iter()
            .find(|q| q.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_quiz(&self, quiz: &Quiz, _at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(lock_err)?;
        match guard.iter_mut().find(|q| q.id() == quiz.id()) {
            Some(existing) => *existing = quiz.clone(),
            None => guard.push(quiz.clone()),
        }
        Ok(())
    }

    async fn count_quizzes(&self) -> Result<usize, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.len())
    }

    async fn delete_all_quizzes(&self) -> Result<usize, StorageError> {
        let mut guard = self.quizzes.lock().map_err(lock_err)?;
        let count = guard.len();
        guard.clear();
        Ok(count)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationId, StorageError> {
        let mut guard = self.notifications.lock().map_err(lock_err)?;
        guard.next_id += 1;
        let id = NotificationId::new(guard.next_id);
        guard.rows.push(Notification {
            id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            read: false,
            created_at: notification.created_at,
        });
        Ok(id)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, StorageError> {
        let guard = self.notifications.lock().map_err(lock_err)?;
        let mut rows: Vec<Notification> = guard
            .rows
            .iter()
            .filter(|n| &n.user_id == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), StorageError> {
        let mut guard = self.notifications.lock().map_err(lock_err)?;
        let row = guard
            .rows
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StorageError::NotFound)?;
        row.read = true;
        Ok(())
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<usize, StorageError> {
        let mut guard = self.notifications.lock().map_err(lock_err)?;
        let mut changed = 0;
        for row in guard.rows.iter_mut().filter(|n| &n.user_id == user && !n.read) {
            row.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<(), StorageError> {
        let mut guard = self.notifications.lock().map_err(lock_err)?;
        let before = guard.rows.len();
        guard.rows.retain(|n| n.id != id);
        if guard.rows.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_user(&self, user: &UserId) -> Result<usize, StorageError> {
        let mut guard = self.notifications.lock().map_err(lock_err)?;
        let before = guard.rows.len();
        guard.rows.retain(|n| &n.user_id != user);
        Ok(before - guard.rows.len())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.kv.lock().map_err(lock_err)?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.kv.lock().map_err(lock_err)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.kv.lock().map_err(lock_err)?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// In-memory storage whose catalog starts with `quizzes`.
    #[must_use]
    pub fn in_memory_with(quizzes: Vec<Quiz>) -> Self {
        Self::from_in_memory(InMemoryRepository::with_quizzes(quizzes))
    }

    fn from_in_memory(repo: InMemoryRepository) -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let notifications: Arc<dyn NotificationRepository> = Arc::new(repo.clone());
        let kv: Arc<dyn KeyValueStore> = Arc::new(repo);
        Self {
            quizzes,
            notifications,
            kv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizDraft;
    use quiz_core::time::fixed_now;

    fn quiz(id: &str, title: &str) -> Quiz {
        QuizDraft {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: "General".into(),
            difficulty: "Beginner".into(),
            duration: 5,
            questions: Vec::new(),
            created_at: None,
            updated_at: None,
        }
        .validate()
        .unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let repo = InMemoryRepository::new();
        repo.upsert_quiz(&quiz("a", "First"), fixed_now()).await.unwrap();
        repo.upsert_quiz(&quiz("b", "Second"), fixed_now()).await.unwrap();
        repo.upsert_quiz(&quiz("a", "First again"), fixed_now()).await.unwrap();

        let all = repo.list_quizzes().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title(), "First again");

        let missing = repo.get_quiz(&QuizId::new("zzz").unwrap()).await;
        assert!(matches!(missing, Err(StorageError::NotFound)));
        assert_eq!(repo.delete_all_quizzes().await.unwrap(), 2);
        assert_eq!(repo.count_quizzes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn notifications_are_newest_first_and_per_user() {
        let repo = InMemoryRepository::new();
        for (ts, who) in [(10, "u1"), (30, "u1"), (20, "u2")] {
            repo.insert_notification(NewNotification {
                user_id: user(who),
                title: format!("t{ts}"),
                message: String::new(),
                kind: NotificationKind::System,
                created_at: ts,
            })
            .await
            .unwrap();
        }

        let feed = repo.list_for_user(&user("u1")).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].created_at, 30);

        assert_eq!(repo.mark_all_read(&user("u1")).await.unwrap(), 2);
        assert_eq!(repo.mark_all_read(&user("u1")).await.unwrap(), 0);
        assert_eq!(repo.delete_for_user(&user("u2")).await.unwrap(), 1);
        assert!(matches!(
            repo.mark_read(NotificationId::new(99)).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn kv_remove_is_idempotent() {
        let repo = InMemoryRepository::new();
        repo.set("k", "v").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
        repo.remove("k").await.unwrap();
        repo.remove("k").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), None);
    }
}
