use anyhow::{anyhow, Result};
use std::env;

/// Process configuration, loaded once at startup.
///
/// Both secrets are required: the process refuses to start without them
/// rather than limping along with a placeholder.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub database_url: String,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY must be set"))?;

        if api_key.trim().is_empty() {
            return Err(anyhow!("OPENAI_API_KEY must be set"));
        }

        let llm_base_url = non_empty_or(
            env::var("LLM_BASE_URL").ok(),
            "https://api.openai.com/v1",
        );
        let llm_model = non_empty_or(env::var("LLM_MODEL").ok(), "gpt-4o-mini");
        let database_url = non_empty_or(
            env::var("DATABASE_URL").ok(),
            "sqlite:./data/assistant.db",
        );

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        Ok(Config {
            telegram_bot_token: token,
            openai_api_key: api_key,
            llm_base_url,
            llm_model,
            database_url,
            http_port,
        })
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
