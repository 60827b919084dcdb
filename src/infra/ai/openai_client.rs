use crate::core::ai::{
    models::{AiConfig, AiMessage},
    AiError, AiProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any OpenAI-compatible `/chat/completions` endpoint
/// (OpenAI itself, OpenRouter, a local proxy...).
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    organization: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            organization: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization.filter(|o| !o.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn request_error(e: reqwest::Error) -> AiError {
    AiError::Request(e.to_string())
}

/// Pulls `choices[0].message.content` out of a completion response.
fn extract_content(response: &serde_json::Value) -> Result<String, AiError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AiError::Request("Failed to parse response content".to_string()))
}

#[async_trait]
impl AiProvider for OpenAiClient {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, AiError> {
        let mut payload = json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
        });
        if let Some(max_tokens) = config.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }

        let mut request = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload);

        if let Some(organization) = &self.organization {
            request = request.header("OpenAI-Organization", organization);
        }

        let response = request.send().await.map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.map_err(request_error)?;
            return Err(AiError::Request(format!(
                "Chat completion API error: {} - {}",
                status, text
            )));
        }

        let response_json: serde_json::Value = response.json().await.map_err(request_error)?;
        extract_content(&response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice() {
        let response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Hallo!" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        });
        assert_eq!(extract_content(&response).unwrap(), "Hallo!");
    }

    #[test]
    fn missing_content_is_a_request_error() {
        let response = json!({ "error": { "message": "quota exceeded" } });
        assert!(matches!(
            extract_content(&response),
            Err(AiError::Request(_))
        ));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = OpenAiClient::new("key".into()).with_base_url("https://openrouter.ai/api/v1/");
        assert_eq!(
            client.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn blank_organization_is_dropped() {
        let client = OpenAiClient::new("key".into()).with_organization(Some("  ".into()));
        assert!(client.organization.is_none());
    }
}
