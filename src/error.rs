use thiserror::Error;

/// Errors surfaced by handlers and services.
///
/// Every variant is handled locally with a user-facing reply; nothing here
/// is allowed to crash the dispatch loop. Classification parse failures are
/// deliberately absent: a malformed classifier response downgrades to
/// "not a reminder" instead of becoming an error.
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing command argument, unparseable index, over-long input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reminder date/time could not be understood.
    #[error("could not parse date/time from: {0}")]
    TimeParse(String),

    /// Reminder fire time is not in the future at scheduling time.
    #[error("reminder time is in the past")]
    PastTime,

    /// LLM provider failed: network error, non-2xx status, malformed body.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
