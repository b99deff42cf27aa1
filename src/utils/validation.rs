use crate::error::BotError;

const MAX_TASK_LEN: usize = 200;
const MAX_NOTE_LEN: usize = 1000;

/// Validate a `/todo` argument. Empty arguments mean the user typed the
/// bare command; the reply should be a usage hint, not a database write.
pub fn validate_task_text(text: &str) -> Result<String, BotError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(BotError::InvalidInput(
            "Task text cannot be empty".to_string(),
        ));
    }

    if text.len() > MAX_TASK_LEN {
        return Err(BotError::InvalidInput(format!(
            "Task text cannot be longer than {MAX_TASK_LEN} characters"
        )));
    }

    if text.contains('\n') || text.contains('\r') {
        return Err(BotError::InvalidInput(
            "Task text cannot contain line breaks".to_string(),
        ));
    }

    Ok(text.to_string())
}

pub fn validate_note_text(text: &str) -> Result<String, BotError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(BotError::InvalidInput(
            "Note text cannot be empty".to_string(),
        ));
    }

    if text.len() > MAX_NOTE_LEN {
        return Err(BotError::InvalidInput(format!(
            "Note cannot be longer than {MAX_NOTE_LEN} characters"
        )));
    }

    Ok(text.to_string())
}

/// Parse the 1-based index argument of `/done` against a list of `len`
/// entries. Non-numeric and out-of-range values are input errors; the
/// caller replies with a hint and leaves the list unchanged.
pub fn parse_task_index(arg: &str, len: usize) -> Result<usize, BotError> {
    let arg = arg.trim();

    if arg.is_empty() {
        return Err(BotError::InvalidInput(
            "Task number is missing".to_string(),
        ));
    }

    let index: usize = arg
        .parse()
        .map_err(|_| BotError::InvalidInput(format!("'{arg}' is not a task number")))?;

    if index == 0 || index > len {
        return Err(BotError::InvalidInput(format!(
            "Task number must be between 1 and {len}"
        )));
    }

    Ok(index - 1)
}
