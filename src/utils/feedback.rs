use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone)]
pub enum FeedbackType {
    Success,
    Error,
    Info,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }
}

/// Centralized reply helper so every command answers in the same voice.
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        let formatted = format!("{} {}", feedback_type.emoji(), escape_markdown(message));

        self.bot
            .send_message(self.chat_id, formatted)
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send a validation error with a usage hint
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 Suggestion: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }

    /// Plain-text reply without emoji or markdown escaping; used for
    /// conversational LLM output and entity listings.
    pub async fn plain(&self, message: &str) -> ResponseResult<Message> {
        self.bot.send_message(self.chat_id, message).await
    }
}
