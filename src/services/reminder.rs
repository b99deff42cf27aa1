//! One-shot reminder scheduling and delivery.
//!
//! Every reminder lives in two places: a row in the `reminders` table and an
//! in-process timer keyed by the row id. The row is retired at delivery
//! time, so whichever path delivers first (the timer, or the catch-up sweep
//! after a restart) leaves nothing behind for the other.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::{prelude::*, Bot};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::{connection::DatabaseManager, models::Reminder};
use crate::error::BotError;

/// Delivery target for fired reminders. Production wraps the Telegram bot;
/// tests substitute a recorder.
#[async_trait::async_trait]
pub trait ReminderSink: Send + Sync + 'static {
    /// Push the reminder to its owner. Returns whether delivery succeeded.
    async fn deliver(&self, user_id: i64, text: &str) -> bool;
}

/// Sends "🔔 Reminder: ..." to the owner's chat.
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait::async_trait]
impl ReminderSink for TelegramSink {
    async fn deliver(&self, user_id: i64, text: &str) -> bool {
        let message = format!("🔔 Reminder: {text}");
        match self
            .bot
            .send_message(teloxide::types::ChatId(user_id), message)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Failed to deliver reminder to user {}: {}", user_id, e);
                false
            }
        }
    }
}

type PendingTimers = Arc<Mutex<HashMap<i64, JoinHandle<()>>>>;

pub struct ReminderService {
    db: Arc<DatabaseManager>,
    sink: Arc<dyn ReminderSink>,
    scheduler: JobScheduler,
    pending: PendingTimers,
}

impl ReminderService {
    pub async fn new(
        sink: Arc<dyn ReminderSink>,
        db: Arc<DatabaseManager>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            db,
            sink,
            scheduler,
            pending: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Re-arm persisted reminders and start the catch-up sweep.
    ///
    /// Restart policy: future reminders get their timers back, and anything
    /// that came due while no process was running is delivered by the sweep
    /// on its next tick.
    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let rearmed = self.rearm_pending().await?;

        let sink = self.sink.clone();
        let db = self.db.clone();
        let pending = self.pending.clone();

        let sweep_job = Job::new_async("0 * * * * *", move |_uuid, _l| {
            let sink = sink.clone();
            let db = db.clone();
            let pending = pending.clone();
            Box::pin(async move {
                if let Err(e) = deliver_due_reminders(sink, db, pending).await {
                    tracing::error!("Reminder sweep failed: {}", e);
                }
            })
        })?;

        self.scheduler.add(sweep_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Reminder service started - re-armed {} pending reminders, sweeping every minute",
            rearmed
        );
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // JobScheduler is a cheap handle; shutdown wants exclusive access.
        let mut scheduler = self.scheduler.clone();
        scheduler.shutdown().await?;
        Ok(())
    }

    /// Persist a reminder and arm its one-shot timer.
    ///
    /// Rejects fire times that are not in the future relative to scheduling
    /// time. Duplicate reminders for the same owner are permitted.
    pub async fn schedule(
        &self,
        user_id: i64,
        text: &str,
        remind_at: DateTime<Utc>,
    ) -> Result<Reminder, BotError> {
        if remind_at <= Utc::now() {
            return Err(BotError::PastTime);
        }

        let reminder =
            Reminder::create(&self.db.pool, user_id, text.to_string(), remind_at).await?;

        tracing::info!(
            "Scheduled reminder {} for user {} at {}",
            reminder.id,
            user_id,
            reminder.remind_at
        );

        self.arm(&reminder, remind_at).await;
        Ok(reminder)
    }

    /// Cancel a pending reminder. No-op (returns false) when the reminder
    /// already fired or does not belong to `user_id`.
    pub async fn cancel(&self, user_id: i64, reminder_id: i64) -> Result<bool, BotError> {
        let owned = Reminder::find_by_user(&self.db.pool, user_id)
            .await?
            .into_iter()
            .any(|r| r.id == reminder_id);
        if !owned {
            return Ok(false);
        }

        if let Some(handle) = self.pending.lock().await.remove(&reminder_id) {
            handle.abort();
        }
        let removed = Reminder::delete(&self.db.pool, reminder_id).await?;

        if removed {
            tracing::info!("Cancelled reminder {} for user {}", reminder_id, user_id);
        }
        Ok(removed)
    }

    /// Manual sweep trigger for tests and operational checks.
    pub async fn deliver_due_now(&self) -> Result<usize, BotError> {
        deliver_due_reminders(self.sink.clone(), self.db.clone(), self.pending.clone()).await
    }

    async fn rearm_pending(&self) -> Result<usize, BotError> {
        let now = Utc::now();
        let pending = Reminder::find_pending(&self.db.pool, now).await?;
        let count = pending.len();

        for reminder in pending {
            let Some(remind_at) = reminder.fire_time() else {
                tracing::warn!(
                    "Reminder {} has an unreadable fire time '{}', leaving it to the sweep",
                    reminder.id,
                    reminder.remind_at
                );
                continue;
            };
            self.arm(&reminder, remind_at).await;
        }

        Ok(count)
    }

    async fn arm(&self, reminder: &Reminder, remind_at: DateTime<Utc>) {
        let delay = (remind_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);

        let sink = self.sink.clone();
        let db = self.db.clone();
        let pending = self.pending.clone();
        let id = reminder.id;
        let user_id = reminder.user_id;
        let text = reminder.text.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(sink, db, pending, id, user_id, text).await;
        });

        self.pending.lock().await.insert(id, handle);
    }
}

/// Deliver one reminder and retire it. The row is deleted whether or not
/// delivery succeeded: failures are logged, not retried.
async fn fire(
    sink: Arc<dyn ReminderSink>,
    db: Arc<DatabaseManager>,
    pending: PendingTimers,
    id: i64,
    user_id: i64,
    text: String,
) {
    let delivered = sink.deliver(user_id, &text).await;
    if delivered {
        tracing::info!("Delivered reminder {} to user {}", id, user_id);
    }

    if let Err(e) = Reminder::delete(&db.pool, id).await {
        tracing::error!("Failed to retire reminder {}: {}", id, e);
    }
    pending.lock().await.remove(&id);
}

/// Catch-up sweep: deliver reminders whose fire time passed while no timer
/// was armed for them (typically across a restart).
async fn deliver_due_reminders(
    sink: Arc<dyn ReminderSink>,
    db: Arc<DatabaseManager>,
    pending: PendingTimers,
) -> Result<usize, BotError> {
    let due = Reminder::find_due(&db.pool, Utc::now()).await?;
    let mut delivered = 0usize;

    for reminder in due {
        // A timer armed for this row is about to handle it; skip.
        if pending.lock().await.contains_key(&reminder.id) {
            continue;
        }

        fire(
            sink.clone(),
            db.clone(),
            pending.clone(),
            reminder.id,
            reminder.user_id,
            reminder.text.clone(),
        )
        .await;
        delivered += 1;
    }

    if delivered > 0 {
        tracing::info!("Sweep delivered {} overdue reminders", delivered);
    }
    Ok(delivered)
}
