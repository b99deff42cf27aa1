use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A free-form note. Created and listed only; notes have no update or
/// delete surface.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub note: String,
    pub created_at: String,
}

impl Note {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        note: String,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query("INSERT INTO notes (user_id, note, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&note)
            .bind(&created_at)
            .execute(pool)
            .await?;

        Ok(Note {
            id: result.last_insert_rowid(),
            user_id,
            note,
            created_at,
        })
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            "SELECT id, user_id, note, created_at FROM notes WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
