pub mod classifier;
pub mod health;
pub mod llm;
pub mod reminder;
