//! # Assistant Bot
//!
//! A Telegram personal assistant bot backed by an LLM chat-completion API.
//!
//! ## Features
//! - Todo lists, notes and one-shot reminders per user
//! - Free text is classified by the LLM: reminder requests are extracted
//!   and scheduled, everything else gets a conversational reply
//! - Reminders are persisted and re-armed after a restart
//! - Persistent storage with SQLite

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error taxonomy shared by handlers and services
pub mod error;
/// Background services: reminder scheduling, LLM client, health checks
pub mod services;
/// Utility functions for datetime, validation, and formatting
pub mod utils;
