use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A todo item. Owned exclusively by `user_id`; every query is scoped to
/// the owner so tasks are never visible across users.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub task: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub done: bool,
    pub created_at: String,
}

impl Task {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        task: String,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO tasks (user_id, task, done, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(user_id)
        .bind(&task)
        .bind(&created_at)
        .execute(pool)
        .await?;

        Ok(Task {
            id: result.last_insert_rowid(),
            user_id,
            task,
            description: None,
            due_at: None,
            done: false,
            created_at,
        })
    }

    /// All tasks for one owner, oldest first. The position in this list is
    /// the 1-based index users refer to in `/done`.
    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, user_id, task, description, due_at, done, created_at
             FROM tasks WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn set_done(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        task_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET done = 1 WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a task, returning whether a row existed. The owner check is in
    /// the statement itself so a task can never be deleted across users.
    pub async fn delete(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        task_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
