use quiz_core::model::{
    Notification, NotificationId, NotificationKind, QuestionDraft, Quiz, QuizDraft, UserId,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn count_from_u64(field: &'static str, v: u64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn notification_id_from_i64(v: i64) -> Result<NotificationId, StorageError> {
    u64::try_from(v)
        .map(NotificationId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid notification id: {v}")))
}

pub(crate) fn notification_id_to_i64(id: NotificationId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("notification id overflow".into()))
}

pub(crate) fn questions_to_json(quiz: &Quiz) -> Result<String, StorageError> {
    let drafts: Vec<QuestionDraft> = quiz.questions().iter().map(QuestionDraft::from).collect();
    serde_json::to_string(&drafts).map_err(ser)
}

pub(crate) fn map_quiz_row(row: &sqlx::sqlite::SqliteRow) -> Result<Quiz, StorageError> {
    let questions_json: String = row.try_get("questions").map_err(ser)?;
    let questions: Vec<QuestionDraft> = serde_json::from_str(&questions_json).map_err(ser)?;
    let duration: i64 = row.try_get("duration_minutes").map_err(ser)?;

    QuizDraft {
        id: row.try_get("id").map_err(ser)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        category: row.try_get("category").map_err(ser)?,
        difficulty: row.try_get("difficulty").map_err(ser)?,
        duration: u32::try_from(duration)
            .map_err(|_| StorageError::Serialization(format!("invalid duration: {duration}")))?,
        questions,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    }
    .validate()
    .map_err(ser)
}

pub(crate) fn map_notification_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Notification, StorageError> {
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    let kind: String = row.try_get("kind").map_err(ser)?;
    Ok(Notification {
        id: notification_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        user_id: UserId::new(user_id).map_err(ser)?,
        title: row.try_get("title").map_err(ser)?,
        message: row.try_get("message").map_err(ser)?,
        kind: NotificationKind::from(kind),
        read: row.try_get::<bool, _>("read").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
