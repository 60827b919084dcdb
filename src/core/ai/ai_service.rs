use super::models::{AiConfig, AiMessage};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// The provider did not answer within the configured limit.
    #[error("AI request timed out after {0:?}")]
    Timeout(Duration),

    /// Anything else: auth, network, malformed or empty response.
    #[error("AI request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request and returns the model's text.
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, AiError>;
}

// Blanket implementation for Box<dyn AiProvider>
// Lets a provider chosen at runtime sit behind the generic service.
#[async_trait]
impl AiProvider for Box<dyn AiProvider> {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, AiError> {
        (**self).chat_complete(messages, config).await
    }
}

pub struct AiService<P: AiProvider> {
    provider: P,
    config: AiConfig,
}

impl<P: AiProvider> AiService<P> {
    pub fn new(provider: P, config: AiConfig) -> Self {
        Self { provider, config }
    }

    #[cfg(test)]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Asks the model for a single answer to `instruction`.
    ///
    /// Exactly one request is made. If it has not completed after
    /// `config.timeout` the future is dropped, which cancels the HTTP call,
    /// and `AiError::Timeout` is returned.
    pub async fn generate(&self, instruction: &str) -> Result<String, AiError> {
        let messages = [AiMessage::user(instruction)];

        let answer = tokio::time::timeout(
            self.config.timeout,
            self.provider.chat_complete(&messages, &self.config),
        )
        .await
        .map_err(|_| AiError::Timeout(self.config.timeout))??;

        if answer.trim().is_empty() {
            return Err(AiError::Request("model returned an empty message".to_string()));
        }

        Ok(answer.trim().to_string())
    }
}
