use anyhow::Result;
use assistant_bot::database::{connection::DatabaseManager, models::Reminder};
use assistant_bot::error::BotError;
use assistant_bot::services::reminder::{ReminderService, ReminderSink};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::sync::Mutex;

/// Records deliveries instead of talking to Telegram.
struct RecordingSink {
    delivered: Mutex<Vec<(i64, String)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
        })
    }

    async fn deliveries(&self) -> Vec<(i64, String)> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl ReminderSink for RecordingSink {
    async fn deliver(&self, user_id: i64, text: &str) -> bool {
        self.delivered.lock().await.push((user_id, text.to_string()));
        true
    }
}

/// Counts attempts but reports every delivery as failed.
struct FailingSink {
    attempts: Mutex<usize>,
}

#[async_trait]
impl ReminderSink for FailingSink {
    async fn deliver(&self, _user_id: i64, _text: &str) -> bool {
        *self.attempts.lock().await += 1;
        false
    }
}

async fn setup_test_db() -> Result<(Arc<DatabaseManager>, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((Arc::new(db_manager), temp_dir))
}

/// Poll until `cond` holds or a few seconds pass. Timers fire on the real
/// clock here, so assertions need a little patience.
async fn wait_until<F, Fut>(mut cond: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if cond().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::test]
async fn test_schedule_rejects_past_time() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let sink = RecordingSink::new();
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let past = Utc::now() - chrono::Duration::minutes(1);
    let result = service.schedule(1, "too late", past).await;
    assert!(matches!(result, Err(BotError::PastTime)));

    // Nothing was persisted and nothing fires
    assert!(Reminder::find_by_user(&db.pool, 1).await?.is_empty());
    assert!(sink.deliveries().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_scheduled_reminder_fires_exactly_once() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let sink = RecordingSink::new();
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let remind_at = Utc::now() + chrono::Duration::seconds(1);
    let reminder = service.schedule(7, "call mom", remind_at).await?;
    assert!(reminder.id > 0);

    // The row exists until the timer fires
    assert_eq!(Reminder::find_by_user(&db.pool, 7).await?.len(), 1);

    let fired = wait_until(|| async { sink.deliveries().await.len() == 1 }).await;
    assert!(fired, "reminder never fired");

    let deliveries = sink.deliveries().await;
    assert_eq!(deliveries, vec![(7, "call mom".to_string())]);

    // The row is retired after delivery
    let retired = wait_until(|| async {
        Reminder::find_by_user(&db.pool, 7)
            .await
            .map(|r| r.is_empty())
            .unwrap_or(false)
    })
    .await;
    assert!(retired, "reminder row was not retired");

    // Give it a moment and make sure it does not fire again
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(sink.deliveries().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_prevents_delivery() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let sink = RecordingSink::new();
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let remind_at = Utc::now() + chrono::Duration::seconds(30);
    let reminder = service.schedule(1, "meeting", remind_at).await?;

    let cancelled = service.cancel(1, reminder.id).await?;
    assert!(cancelled);
    assert!(Reminder::find_by_user(&db.pool, 1).await?.is_empty());

    // Cancelling again is a no-op
    assert!(!service.cancel(1, reminder.id).await?);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(sink.deliveries().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_cancel_is_scoped_to_owner() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let sink = RecordingSink::new();
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let remind_at = Utc::now() + chrono::Duration::minutes(10);
    let reminder = service.schedule(1, "mine", remind_at).await?;

    // A different user cannot cancel it
    assert!(!service.cancel(2, reminder.id).await?);
    assert_eq!(Reminder::find_by_user(&db.pool, 1).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_sweep_delivers_overdue_reminders() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    // Rows left behind by a previous process, already overdue
    let past = Utc::now() - chrono::Duration::hours(1);
    Reminder::create(&db.pool, 1, "missed one".to_string(), past).await?;
    Reminder::create(&db.pool, 2, "missed two".to_string(), past).await?;

    let sink = RecordingSink::new();
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let delivered = service.deliver_due_now().await?;
    assert_eq!(delivered, 2);

    let deliveries = sink.deliveries().await;
    assert_eq!(deliveries.len(), 2);
    assert!(deliveries.contains(&(1, "missed one".to_string())));
    assert!(deliveries.contains(&(2, "missed two".to_string())));

    assert!(Reminder::find_by_user(&db.pool, 1).await?.is_empty());
    assert!(Reminder::find_by_user(&db.pool, 2).await?.is_empty());

    // A second sweep finds nothing
    assert_eq!(service.deliver_due_now().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_start_rearms_persisted_reminders() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    // A future reminder persisted by a previous process
    let soon = Utc::now() + chrono::Duration::seconds(1);
    Reminder::create(&db.pool, 5, "survived restart".to_string(), soon).await?;

    let sink = RecordingSink::new();
    let mut service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    service.start().await.map_err(|e| anyhow::anyhow!(e))?;

    let fired = wait_until(|| async { sink.deliveries().await.len() == 1 }).await;
    assert!(fired, "re-armed reminder never fired");
    assert_eq!(
        sink.deliveries().await,
        vec![(5, "survived restart".to_string())]
    );

    service.stop().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

#[tokio::test]
async fn test_failed_delivery_still_retires_row() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let sink = Arc::new(FailingSink {
        attempts: Mutex::new(0),
    });
    let service = ReminderService::new(sink.clone(), db.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let remind_at = Utc::now() + chrono::Duration::seconds(1);
    service.schedule(3, "unreachable", remind_at).await?;

    // Delivery fails, the row is retired anyway and there is no retry
    let retired = wait_until(|| async {
        Reminder::find_by_user(&db.pool, 3)
            .await
            .map(|r| r.is_empty())
            .unwrap_or(false)
    })
    .await;
    assert!(retired, "row survived a failed delivery");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(*sink.attempts.lock().await, 1);

    Ok(())
}
