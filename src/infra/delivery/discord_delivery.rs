use async_trait::async_trait;
use serenity::all as serenity;
use std::sync::Arc;

use crate::core::delivery::{split_message, ChatDelivery, DeliveryError};

const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Posts to a Discord channel over the REST API.
///
/// No gateway connection is opened: the bot only needs to write one message
/// per run, so the plain HTTP client is enough.
pub struct DiscordDelivery {
    http: Arc<serenity::Http>,
}

impl DiscordDelivery {
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(serenity::Http::new(token)),
        }
    }
}

fn parse_channel_id(destination: &str) -> Result<serenity::ChannelId, DeliveryError> {
    destination
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::ChannelId::new)
        .ok_or_else(|| DeliveryError::InvalidDestination(destination.to_string()))
}

#[async_trait]
impl ChatDelivery for DiscordDelivery {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        let channel_id = parse_channel_id(destination)?;

        // Split answer if too long (Discord limit 2000)
        for chunk in split_message(text, DISCORD_MESSAGE_LIMIT) {
            channel_id
                .say(&self.http, chunk)
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        }

        tracing::debug!(channel_id = channel_id.get(), "Sent Discord message");
        Ok(())
    }
}
