use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizId};

use super::SqliteRepository;
use super::mapping::{conn, count_from_u64, map_quiz_row, questions_to_json, ser};
use crate::repository::{QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, title, description, category, difficulty,
                    duration_minutes, questions, created_at, updated_at
                FROM quizzes
                ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_quiz_row(&row)?);
        }
        Ok(out)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    id, title, description, category, difficulty,
                    duration_minutes, questions, created_at, updated_at
                FROM quizzes
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_quiz_row(&row)
    }

    async fn upsert_quiz(&self, quiz: &Quiz, at: DateTime<Utc>) -> Result<(), StorageError> {
        let questions = questions_to_json(quiz)?;
        let stamp = at.timestamp_millis();

        // New rows go to the end of the catalog; updates keep their position and created_at.
        sqlx::query(
            r"
                INSERT INTO quizzes (
                    id, position, title, description, category, difficulty,
                    duration_minutes, questions, created_at, updated_at
                )
                VALUES (
                    ?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM quizzes),
                    ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8
                )
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    category = excluded.category,
                    difficulty = excluded.difficulty,
                    duration_minutes = excluded.duration_minutes,
                    questions = excluded.questions,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.title())
        .bind(quiz.description())
        .bind(quiz.category())
        .bind(quiz.difficulty().as_str())
        .bind(i64::from(quiz.duration_minutes()))
        .bind(questions)
        .bind(stamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn count_quizzes(&self) -> Result<usize, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        usize::try_from(count).map_err(ser)
    }

    async fn delete_all_quizzes(&self) -> Result<usize, StorageError> {
        let res = sqlx::query("DELETE FROM quizzes")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        count_from_u64("deleted quizzes", res.rows_affected())
    }
}
