use quiz_core::model::{Notification, NotificationId, UserId};

use super::SqliteRepository;
use super::mapping::{
    conn, count_from_u64, map_notification_row, notification_id_from_i64, notification_id_to_i64,
};
use crate::repository::{NewNotification, NotificationRepository, StorageError};

#[async_trait::async_trait]
impl NotificationRepository for SqliteRepository {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO notifications (user_id, title, message, kind, read, created_at)
                VALUES (?1, ?2, ?3, ?4, 0, ?5)
            ",
        )
        .bind(notification.user_id.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        notification_id_from_i64(res.last_insert_rowid())
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, title, message, kind, read, created_at
                FROM notifications
                WHERE user_id = ?1
                ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_notification_row(&row)?);
        }
        Ok(out)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?1")
            .bind(notification_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<usize, StorageError> {
        let res = sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0")
            .bind(user.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        count_from_u64("updated notifications", res.rows_affected())
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM notifications WHERE id = ?1")
            .bind(notification_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_user(&self, user: &UserId) -> Result<usize, StorageError> {
        let res = sqlx::query("DELETE FROM notifications WHERE user_id = ?1")
            .bind(user.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        count_from_u64("deleted notifications", res.rows_affected())
    }
}
