//! Free-text handling: reminder classification first, conversation second.

use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::error::BotError;
use crate::services::classifier;
use crate::services::llm::{ChatApi, ChatMessage};
use crate::services::reminder::ReminderService;
use crate::utils::datetime::{format_datetime, parse_fuzzy_datetime};
use crate::utils::feedback::CommandFeedback;

const CHAT_MAX_TOKENS: u32 = 300;

const CHAT_SYSTEM_PROMPT: &str =
    "You are a friendly personal assistant chatting over Telegram. Keep replies concise.";

pub async fn handle_chat(
    bot: Bot,
    msg: Message,
    llm: Arc<dyn ChatApi>,
    reminders: Arc<ReminderService>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    let feedback = CommandFeedback::new(bot, msg.chat.id);

    // Commands that reach this branch didn't match the command filter.
    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        feedback
            .validation_error(
                &format!("Unknown command: {command}"),
                "Use /help to see all available commands",
            )
            .await?;
        return Ok(());
    }

    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);

    // Reminder check first; any classification failure falls through to chat.
    if let Some(candidate) = classifier::classify(llm.as_ref(), text).await {
        match parse_fuzzy_datetime(&candidate.time, Utc::now()) {
            Ok(remind_at) => {
                match reminders.schedule(user_id, &candidate.text, remind_at).await {
                    Ok(_) => {
                        feedback
                            .success(&format!(
                                "Got it! Reminder set ⏰: {} at {}",
                                candidate.text,
                                format_datetime(&remind_at)
                            ))
                            .await?;
                    }
                    Err(BotError::PastTime) => {
                        feedback
                            .error("That looks like a reminder, but the time is already in the past")
                            .await?;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to schedule classified reminder for user {}: {}",
                            user_id,
                            e
                        );
                        feedback.error("Failed to save the reminder").await?;
                    }
                }
            }
            Err(_) => {
                feedback
                    .info(
                        "That looks like a reminder, but I couldn't read the time 😔 \
                         Try something like: 'remind me tomorrow at 18:00 to ...'",
                    )
                    .await?;
            }
        }
        return Ok(());
    }

    // Ordinary conversation.
    let messages = [
        ChatMessage::system(CHAT_SYSTEM_PROMPT),
        ChatMessage::user(text),
    ];
    match llm.complete(&messages, CHAT_MAX_TOKENS).await {
        Ok(reply) => {
            feedback.plain(&reply).await?;
        }
        Err(e) => {
            tracing::error!("Conversational completion failed for user {}: {}", user_id, e);
            feedback
                .error("Sorry, I could not reach the assistant right now. Please try again later.")
                .await?;
        }
    }

    Ok(())
}
