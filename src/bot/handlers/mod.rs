pub mod chat;
pub mod message;

use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::database::connection::DatabaseManager;
use crate::services::llm::ChatApi;
use crate::services::reminder::ReminderService;

/// Error type of the dispatch tree. Handlers answer the user themselves;
/// only transport failures bubble up to the dispatcher's error handler.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// All dependencies the dispatch tree needs, constructed once in `main`
/// and injected into handlers.
pub struct BotHandler {
    pub db: DatabaseManager,
    pub reminders: Arc<ReminderService>,
    pub llm: Arc<dyn ChatApi>,
}

impl BotHandler {
    pub fn new(
        db: DatabaseManager,
        reminders: Arc<ReminderService>,
        llm: Arc<dyn ChatApi>,
    ) -> Self {
        Self { db, reminders, llm }
    }

    /// Commands first; any other message falls through to the free-text
    /// classifier + chat handler.
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let db = self.db.clone();
        let reminders = self.reminders.clone();
        let chat_llm = self.llm.clone();
        let chat_reminders = self.reminders.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<crate::bot::commands::Command>()
                    .endpoint(move |bot, msg, cmd| {
                        let db = db.clone();
                        let reminders = reminders.clone();
                        async move { message::command_handler(bot, msg, cmd, db, reminders).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot, msg| {
                let llm = chat_llm.clone();
                let reminders = chat_reminders.clone();
                async move { chat::handle_chat(bot, msg, llm, reminders).await }
            }))
    }
}
