//! HTTP client for a Messages-style language model API

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MailError, Result};
use crate::prompt::PromptVariant;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Base URL without the `/v1/messages` suffix
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct MailClient {
    config: MailConfig,
    client: Client,
}

impl MailClient {
    pub fn new(config: MailConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(API_VERSION),
        );
        if let Some(ref api_key) = config.api_key {
            let mut value = header::HeaderValue::from_str(api_key)
                .map_err(|_| MailError::Config("API key contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the prompt, send it once and return the model's text
    pub async fn run(&self, variant: &PromptVariant) -> Result<String> {
        let prompt = variant.build()?;
        debug!(variant = variant.name(), chars = prompt.len(), "Sending prompt");
        self.complete(&prompt).await
    }

    /// Send one user message and return the text of the first content block
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .json(&request)
            .send()
            .await?;

        let body: MessagesResponse = self.handle_response(response).await?;
        body.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| MailError::InvalidResponse("no text in first content block".into()))
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Language model API is rate limiting");
            }
            return Err(MailError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| MailError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url_tolerates_trailing_slash() {
        let client = MailClient::new(MailConfig {
            base_url: "http://localhost:9999/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.messages_url(), "http://localhost:9999/v1/messages");
    }

    #[test]
    fn test_defaults() {
        let config = MailConfig::default();
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let result = MailClient::new(MailConfig {
            api_key: Some("bad\nkey".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(MailError::Config(_))));
    }
}
