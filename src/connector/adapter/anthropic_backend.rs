use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ModelBackend;
use crate::domain::{DomainError, ModelConfig};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const BACKEND_NAME: &str = "anthropic";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for the Anthropic Messages API (and compatible endpoints such as
/// LM Studio).
///
/// Only the text of the first content block is returned; a reply without one
/// is treated as malformed.
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: ModelConfig,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicBackend {
    pub fn new(config: ModelConfig) -> Self {
        let url = format!("{}{}", config.base_url(), MESSAGES_PATH);
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(config.timeout())
                .build()
                .unwrap_or_default(),
            config,
            url,
        }
    }

    fn error(cause: impl Into<String>) -> DomainError {
        DomainError::model_backend(BACKEND_NAME, cause)
    }

    /// Pull the reply string out of a Messages API response body.
    fn extract_text(body: &str) -> Result<String, DomainError> {
        let api_response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| Self::error(format!("failed to parse response: {e}")))?;

        api_response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| Self::error("response contained no text content"))
    }
}

#[async_trait]
impl ModelBackend for AnthropicBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, DomainError> {
        let request = ApiRequest {
            model: self.config.model_id(),
            max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::error(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::error(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            warn!("AnthropicBackend: API returned {status}: {body}");
            return Err(Self::error(format!("API returned {status}")));
        }

        debug!("AnthropicBackend: received {} bytes", body.len());
        Self::extract_text(&body)
    }
}
