//! # Assistant Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! the reminder service, and runs the Telegram bot alongside the health
//! check server.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod error;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::health::HealthService;
use crate::services::llm::LlmClient;
use crate::services::reminder::{ReminderService, TelegramSink};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; both secrets are required and missing ones are fatal
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Assistant Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Model: {}",
        config.database_url, config.http_port, config.llm_model
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot and LLM client
    let bot = Bot::new(&config.telegram_bot_token);
    let llm: Arc<LlmClient> = Arc::new(LlmClient::new(
        config.llm_base_url.clone(),
        config.openai_api_key.clone(),
        config.llm_model.clone(),
    ));

    // Initialize and start the reminder service; this re-arms persisted
    // reminders and starts the catch-up sweep
    info!("Initializing reminder service...");
    let sink = Arc::new(TelegramSink::new(bot.clone()));
    let mut reminder_service = match ReminderService::new(sink, db_arc.clone()).await {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to create reminder service: {}", e);
            return Err(anyhow::anyhow!("Failed to create reminder service: {}", e));
        }
    };

    if let Err(e) = reminder_service.start().await {
        tracing::error!("Failed to start reminder service: {}", e);
    } else {
        info!("Reminder service started successfully");
    }
    let reminders = Arc::new(reminder_service);

    let handler = BotHandler::new(db_arc.as_ref().clone(), reminders.clone(), llm);
    info!("Telegram bot initialized successfully");

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // Stop reminder service on shutdown
    if let Err(e) = reminders.stop().await {
        tracing::warn!("Error stopping reminder service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
