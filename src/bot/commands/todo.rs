use teloxide::prelude::*;

use crate::database::{connection::DatabaseManager, models::Task};
use crate::error::BotError;
use crate::utils::feedback::CommandFeedback;
use crate::utils::validation::{parse_task_index, validate_task_text};

pub async fn handle_todo(
    bot: Bot,
    msg: Message,
    task: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let task = match validate_task_text(&task) {
        Ok(task) => task,
        Err(e) => {
            tracing::debug!("Rejected /todo from user {}: {}", user_id, e);
            feedback
                .validation_error(
                    "Write the task after the command",
                    "Example: /todo Buy bread",
                )
                .await?;
            return Ok(());
        }
    };

    match Task::create(&db.pool, user_id, task).await {
        Ok(created) => {
            tracing::info!("User {} added task {}", user_id, created.id);
            feedback
                .success(&format!("Task added: {}", created.task))
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to create task for user {}: {}", user_id, e);
            feedback.error("Failed to save the task").await?;
        }
    }

    Ok(())
}

pub async fn handle_tasks(bot: Bot, msg: Message, db: &DatabaseManager) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let tasks = match Task::find_by_user(&db.pool, user_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::error!("Failed to list tasks for user {}: {}", user_id, e);
            feedback.error("Failed to load your tasks").await?;
            return Ok(());
        }
    };

    if tasks.is_empty() {
        feedback.plain("You have no tasks yet 📝").await?;
        return Ok(());
    }

    let mut text = String::from("📝 Your tasks:\n");
    for (i, task) in tasks.iter().enumerate() {
        let marker = if task.done { "✅" } else { "🔹" };
        text.push_str(&format!("{} {}. {}\n", marker, i + 1, task.task));
    }

    feedback.plain(&text).await?;
    Ok(())
}

pub async fn handle_done(
    bot: Bot,
    msg: Message,
    index: String,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    let tasks = match Task::find_by_user(&db.pool, user_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::error!("Failed to list tasks for user {}: {}", user_id, e);
            feedback.error("Failed to load your tasks").await?;
            return Ok(());
        }
    };

    let position = match parse_task_index(&index, tasks.len()) {
        Ok(position) => position,
        Err(BotError::InvalidInput(e)) => {
            feedback
                .validation_error(&e, "Use the number shown by /tasks, e.g. /done 1")
                .await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!("Unexpected error parsing /done index: {}", e);
            feedback.error("Failed to remove the task").await?;
            return Ok(());
        }
    };

    let target = &tasks[position];
    match Task::delete(&db.pool, user_id, target.id).await {
        Ok(true) => {
            tracing::info!("User {} removed task {}", user_id, target.id);
            feedback
                .success(&format!("Task done: {}", target.task))
                .await?;
        }
        Ok(false) => {
            feedback.error("That task no longer exists").await?;
        }
        Err(e) => {
            tracing::error!("Failed to delete task {} for user {}: {}", target.id, user_id, e);
            feedback.error("Failed to remove the task").await?;
        }
    }

    Ok(())
}
