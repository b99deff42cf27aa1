use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::handlers::HandlerResult;
use crate::database::connection::DatabaseManager;
use crate::services::reminder::ReminderService;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: DatabaseManager,
    reminders: Arc<ReminderService>,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "👋 Hi! I'm your personal assistant.\n\n\
                 I can chat, keep your tasks and notes, and remind you about things.\n\
                 Try writing: 'remind me tomorrow at 10:00 to buy milk' 😉\n\n\
                 Use /help to see all commands.",
            )
            .await?;
        }
        Command::Todo { task } => {
            crate::bot::commands::todo::handle_todo(bot, msg, task, &db).await?;
        }
        Command::Tasks => {
            crate::bot::commands::todo::handle_tasks(bot, msg, &db).await?;
        }
        Command::Note { text } => {
            crate::bot::commands::notes::handle_note(bot, msg, text, &db).await?;
        }
        Command::Notes => {
            crate::bot::commands::notes::handle_notes(bot, msg, &db).await?;
        }
        Command::Remind { args } => {
            crate::bot::commands::remind::handle_remind(bot, msg, args, reminders).await?;
        }
        Command::Done { index } => {
            crate::bot::commands::todo::handle_done(bot, msg, index, &db).await?;
        }
    }
    Ok(())
}
