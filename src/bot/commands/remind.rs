use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::error::BotError;
use crate::services::reminder::ReminderService;
use crate::utils::datetime::{format_datetime, parse_remind_args};
use crate::utils::feedback::CommandFeedback;

const FORMAT_HINT: &str = "Format: /remind Call mom 27.09.2025 18:00";

pub async fn handle_remind(
    bot: Bot,
    msg: Message,
    args: String,
    reminders: Arc<ReminderService>,
) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    if args.trim().is_empty() {
        feedback
            .validation_error("Write the reminder after the command", FORMAT_HINT)
            .await?;
        return Ok(());
    }

    let (text, remind_at) = match parse_remind_args(&args, Utc::now()) {
        Ok(parsed) => parsed,
        Err(BotError::InvalidInput(_)) => {
            feedback
                .validation_error("The reminder has no text", FORMAT_HINT)
                .await?;
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("Could not parse /remind from user {}: {}", user_id, e);
            feedback
                .validation_error("Could not read the date/time 😔", FORMAT_HINT)
                .await?;
            return Ok(());
        }
    };

    match reminders.schedule(user_id, &text, remind_at).await {
        Ok(_) => {
            feedback
                .success(&format!(
                    "Reminder saved ⏰: {} at {}",
                    text,
                    format_datetime(&remind_at)
                ))
                .await?;
        }
        Err(BotError::PastTime) => {
            feedback
                .validation_error("That time is already in the past", FORMAT_HINT)
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to schedule reminder for user {}: {}", user_id, e);
            feedback.error("Failed to save the reminder").await?;
        }
    }

    Ok(())
}
