use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted one-shot reminder. The row exists from scheduling until the
/// delivery attempt; retiring the row is what marks a reminder as fired.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub remind_at: String,
}

impl Reminder {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        text: String,
        remind_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let remind_at = remind_at.to_rfc3339();

        let result =
            sqlx::query("INSERT INTO reminders (user_id, text, remind_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(&text)
                .bind(&remind_at)
                .execute(pool)
                .await?;

        Ok(Reminder {
            id: result.last_insert_rowid(),
            user_id,
            text,
            remind_at,
        })
    }

    pub fn fire_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.remind_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, user_id, text, remind_at FROM reminders WHERE user_id = ? ORDER BY remind_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Reminders whose fire time is still ahead of `now`. Used to re-arm
    /// in-process timers after a restart.
    pub async fn find_pending(
        pool: &sqlx::SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, user_id, text, remind_at FROM reminders WHERE remind_at > ? ORDER BY remind_at",
        )
        .bind(now.to_rfc3339())
        .fetch_all(pool)
        .await
    }

    /// Reminders whose fire time has passed. These were missed while no
    /// process was running and are picked up by the catch-up sweep.
    pub async fn find_due(
        pool: &sqlx::SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, user_id, text, remind_at FROM reminders WHERE remind_at <= ? ORDER BY remind_at",
        )
        .bind(now.to_rfc3339())
        .fetch_all(pool)
        .await
    }

    pub async fn delete(
        pool: &sqlx::SqlitePool,
        reminder_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(reminder_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
