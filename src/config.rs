//! Application configuration from the environment
//!
//! Credentials come from environment variables, with `.env` entries loaded
//! at startup. Binance keys are required; Telegram credentials are optional
//! and their absence only disables outbound alerts.

use anyhow::{bail, Result};

/// Secrets used across the app
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_secret: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env_trimmed("BINANCE_API_KEY");
        let api_secret = env_trimmed("BINANCE_API_SECRET");

        if api_key.is_empty() || api_secret.is_empty() {
            bail!(
                "Missing Binance API credentials. Set BINANCE_API_KEY and \
                 BINANCE_API_SECRET as environment variables or .env entries."
            );
        }

        Ok(Self {
            api_key,
            api_secret,
            telegram_bot_token: env_optional("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: env_optional("TELEGRAM_CHAT_ID"),
        })
    }
}

fn env_trimmed(name: &str) -> String {
    std::env::var(name).unwrap_or_default().trim().to_string()
}

fn env_optional(name: &str) -> Option<String> {
    let value = env_trimmed(name);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
