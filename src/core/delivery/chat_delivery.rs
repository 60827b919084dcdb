use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid destination '{0}'")]
    InvalidDestination(String),
    #[error("Chat API rejected the message: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Sends plain text to a chat destination (a Telegram chat, a Discord channel).
///
/// One call is one best-effort attempt; there is no retry and no delivery
/// receipt beyond the call completing.
#[async_trait]
pub trait ChatDelivery: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl ChatDelivery for Box<dyn ChatDelivery> {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        (**self).send(destination, text).await
    }
}

/// Splits `text` into chunks of at most `limit` characters.
///
/// Chat platforms cap message length (Discord 2000, Telegram 4096), and a
/// crash trace can easily exceed that. Splits on char boundaries, never
/// inside a UTF-8 sequence.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() || limit == 0 {
        return vec![text.to_string()];
    }

    text.chars()
        .collect::<Vec<char>>()
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hi", 2000), vec!["hi".to_string()]);
    }

    #[test]
    fn long_text_is_split_on_char_boundaries() {
        let text = "💪".repeat(5);
        let chunks = split_message(&text, 2);
        assert_eq!(chunks, vec!["💪💪", "💪💪", "💪"]);
    }

    #[test]
    fn empty_text_is_kept() {
        assert_eq!(split_message("", 10), vec![String::new()]);
    }
}
