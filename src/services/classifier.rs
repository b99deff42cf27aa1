//! Reminder classification for free-text messages.
//!
//! The LLM is asked whether a message encodes a reminder and, if so, to
//! extract the body text and a `YYYY-MM-DD HH:MM` time. Model output is
//! quasi-structured at best, so decoding is schema-validated with an
//! explicit fallback: anything that does not decode into a reminder is
//! treated as ordinary chat. This path never returns an error.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::services::llm::{ChatApi, ChatMessage};

const CLASSIFY_MAX_TOKENS: u32 = 100;

const CLASSIFY_SYSTEM_PROMPT: &str =
    "You are an assistant. Your job is to extract reminders from messages.";

/// A message the LLM recognized as a reminder request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderCandidate {
    pub text: String,
    pub time: String,
}

#[derive(Deserialize)]
struct Classification {
    reminder: bool,
    text: Option<String>,
    time: Option<String>,
}

pub fn classification_prompt(message: &str) -> String {
    format!(
        "Message: '{message}'. If this is a reminder, return JSON of the form: \
         {{'reminder': true, 'text': '...', 'time': 'YYYY-MM-DD HH:MM'}}. \
         If not, return {{'reminder': false}}"
    )
}

/// Ask the LLM whether `text` encodes a reminder.
///
/// Fails open: a provider error aborts classification and the caller falls
/// through to the conversational path.
pub async fn classify(api: &dyn ChatApi, text: &str) -> Option<ReminderCandidate> {
    let messages = [
        ChatMessage::system(CLASSIFY_SYSTEM_PROMPT),
        ChatMessage::user(classification_prompt(text)),
    ];

    match api.complete(&messages, CLASSIFY_MAX_TOKENS).await {
        Ok(raw) => parse_classification(&raw),
        Err(e) => {
            warn!("Classification call failed, treating as chat: {}", e);
            None
        }
    }
}

/// Decode the model's reply into a [`ReminderCandidate`].
///
/// Tolerates fenced code blocks and single-quote pseudo-JSON. Any decode
/// failure, `reminder: false`, or missing field yields `None`.
pub fn parse_classification(raw: &str) -> Option<ReminderCandidate> {
    let normalized = normalize_payload(raw);

    let parsed: Classification = match serde_json::from_str(&normalized) {
        Ok(c) => c,
        Err(e) => {
            debug!("Classification did not decode ({}): {}", e, raw);
            return None;
        }
    };

    if !parsed.reminder {
        return None;
    }

    match (parsed.text, parsed.time) {
        (Some(text), Some(time)) if !text.trim().is_empty() && !time.trim().is_empty() => {
            Some(ReminderCandidate {
                text: text.trim().to_string(),
                time: time.trim().to_string(),
            })
        }
        _ => {
            debug!("Classification claimed a reminder but omitted text or time");
            None
        }
    }
}

/// Strip code fences and, when the payload carries no double quotes at all,
/// rewrite single quotes so `{'reminder': false}` style output decodes.
fn normalize_payload(raw: &str) -> String {
    let mut s = raw.trim();

    if let Some(stripped) = s.strip_prefix("```json") {
        s = stripped;
    } else if let Some(stripped) = s.strip_prefix("```") {
        s = stripped;
    }
    if let Some(stripped) = s.strip_suffix("```") {
        s = stripped;
    }

    let s = s.trim();
    if s.contains('"') {
        s.to_string()
    } else {
        s.replace('\'', "\"")
    }
}
