use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::delivery::{split_message, ChatDelivery, DeliveryError};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramDelivery {
    client: Client,
    bot_token: String,
    api_url: String,
}

impl TelegramDelivery {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            api_url: TELEGRAM_API_URL.to_string(),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }

    async fn send_chunk(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            // reqwest puts the URL (and with it the bot token) into its errors
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body: TelegramResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        if !status.is_success() || !body.ok {
            return Err(DeliveryError::Rejected(format!(
                "{} - {}",
                status,
                body.description.unwrap_or_else(|| "no description".to_string())
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ChatDelivery for TelegramDelivery {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        if destination.trim().is_empty() {
            return Err(DeliveryError::InvalidDestination(destination.to_string()));
        }

        for chunk in split_message(text, TELEGRAM_MESSAGE_LIMIT) {
            self.send_chunk(destination, &chunk).await?;
        }

        tracing::debug!(chat_id = destination, "Sent Telegram message");
        Ok(())
    }
}
