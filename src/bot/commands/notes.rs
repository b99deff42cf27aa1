use teloxide::prelude::*;

use crate::database::{connection::DatabaseManager, models::Note};
use crate::utils::feedback::CommandFeedback;
use crate::utils::validation::validate_note_text;

pub async fn handle_note(
    bot: Bot,
    msg: Message,
    text: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let text = match validate_note_text(&text) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Rejected /note from user {}: {}", user_id, e);
            feedback
                .validation_error(
                    "Write the note after the command",
                    "Example: /note Project idea",
                )
                .await?;
            return Ok(());
        }
    };

    match Note::create(&db.pool, user_id, text).await {
        Ok(created) => {
            tracing::info!("User {} saved note {}", user_id, created.id);
            feedback.success("Note saved 📝").await?;
        }
        Err(e) => {
            tracing::error!("Failed to create note for user {}: {}", user_id, e);
            feedback.error("Failed to save the note").await?;
        }
    }

    Ok(())
}

pub async fn handle_notes(bot: Bot, msg: Message, db: &DatabaseManager) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let notes = match Note::find_by_user(&db.pool, user_id).await {
        Ok(notes) => notes,
        Err(e) => {
            tracing::error!("Failed to list notes for user {}: {}", user_id, e);
            feedback.error("Failed to load your notes").await?;
            return Ok(());
        }
    };

    if notes.is_empty() {
        feedback.plain("No notes yet 📒").await?;
        return Ok(());
    }

    let mut text = String::from("📒 Your notes:\n");
    for (i, note) in notes.iter().enumerate() {
        text.push_str(&format!("🔹 {}. {}\n", i + 1, note.note));
    }

    feedback.plain(&text).await?;
    Ok(())
}
