use std::sync::Arc;

use tracing::debug;

use quiz_core::Clock;
use quiz_core::format::format_relative;
use quiz_core::model::{Notification, NotificationId, NotificationKind, UserId, badge_label};
use quiz_core::time::from_millis;
use storage::repository::{NewNotification, NotificationRepository};

use crate::error::NotificationError;

/// Row of the notification feed, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub notification: Notification,
    pub icon: &'static str,
    /// `Just now`, `5m ago`, ... relative to the service clock.
    pub time_label: String,
}

#[derive(Clone)]
pub struct NotificationService {
    clock: Clock,
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn NotificationRepository>) -> Self {
        Self { clock, repo }
    }

    /// # Errors
    ///
    /// Returns `NotificationError::Storage` on read failures.
    pub async fn list(&self, user: &UserId) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.repo.list_for_user(user).await?)
    }

    /// Newest first, with icons and relative times.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::Storage` on read failures.
    pub async fn feed(&self, user: &UserId) -> Result<Vec<NotificationItem>, NotificationError> {
        let now = self.clock.now();
        Ok(self
            .list(user)
            .await?
            .into_iter()
            .map(|notification| NotificationItem {
                icon: notification.kind.icon(),
                time_label: format_relative(now, from_millis(notification.created_at)),
                notification,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `NotificationError::Storage` on read failures.
    pub async fn unread_count(&self, user: &UserId) -> Result<usize, NotificationError> {
        let items = self.list(user).await?;
        Ok(items.iter().filter(|n| !n.read).count())
    }

    /// Tab badge text: empty when nothing is unread.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::Storage` on read failures.
    pub async fn badge(&self, user: &UserId) -> Result<String, NotificationError> {
        Ok(badge_label(self.unread_count(user).await?))
    }

    /// # Errors
    ///
    /// Returns `NotificationError::Storage` if the id is unknown or the write fails.
    pub async fn mark_read(&self, id: NotificationId) -> Result<(), NotificationError> {
        Ok(self.repo.mark_read(id).await?)
    }

    /// # Errors
    ///
    /// Returns `NotificationError::Storage` if the write fails.
    pub async fn mark_all_read(&self, user: &UserId) -> Result<usize, NotificationError> {
        Ok(self.repo.mark_all_read(user).await?)
    }

    /// # Errors
    ///
    /// Returns `NotificationError::Storage` if the delete fails.
    pub async fn delete(&self, id: NotificationId) -> Result<(), NotificationError> {
        Ok(self.repo.delete_notification(id).await?)
    }

    /// Add an unread notification stamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::EmptyTitle` for a blank title, or `Storage`.
    pub async fn notify(
        &self,
        user: &UserId,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<NotificationId, NotificationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NotificationError::EmptyTitle);
        }
        let id = self
            .repo
            .insert_notification(NewNotification {
                user_id: user.clone(),
                title: title.to_owned(),
                message: message.trim().to_owned(),
                kind,
                created_at: self.clock.now_millis(),
            })
            .await?;
        debug!(user = %user, id = id.value(), "notification added");
        Ok(id)
    }
}
