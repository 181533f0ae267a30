//! Telegram alert delivery
//!
//! Delivery is strictly best-effort: missing credentials mean alerts are
//! logged and skipped, and API failures surface as warnings at the call
//! site, never as fatal errors.

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build a notifier when both credentials are configured.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some(Self::new(token, chat_id, TELEGRAM_API_BASE)),
            _ => {
                debug!("telegram credentials missing; alerts stay local");
                None
            }
        }
    }

    pub fn new(token: &str, chat_id: &str, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Telegram API error {}: {}", status, body));
        }
        Ok(())
    }
}
