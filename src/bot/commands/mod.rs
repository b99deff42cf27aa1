pub mod notes;
pub mod remind;
pub mod todo;

use teloxide::utils::command::BotCommands;

/// Recognized commands. Single-argument commands receive the whole tail of
/// the message; a bare command arrives as the empty string and is answered
/// with a usage hint by the handler.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Personal assistant commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Add a task: /todo Buy bread")]
    Todo { task: String },
    #[command(description = "Show your tasks")]
    Tasks,
    #[command(description = "Save a note: /note Project idea")]
    Note { text: String },
    #[command(description = "Show your notes")]
    Notes,
    #[command(description = "Schedule a reminder: /remind Call mom 27.09.2025 18:00")]
    Remind { args: String },
    #[command(description = "Remove a task by its list number: /done 1")]
    Done { index: String },
}
