use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ModelBackend;
use crate::domain::{DomainError, ModelConfig};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const BACKEND_NAME: &str = "openai";

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
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the OpenAI Chat Completions API and compatible servers.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: ModelConfig,
    url: String,
}

impl OpenAiBackend {
    pub fn new(config: ModelConfig) -> Self {
        let url = format!("{}{}", config.base_url(), COMPLETIONS_PATH);
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

    fn extract_text(body: &str) -> Result<String, DomainError> {
        let api_response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| Self::error(format!("failed to parse response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Self::error("response contained no message content"))
    }
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
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
            .bearer_auth(self.config.api_key())
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
            warn!("OpenAiBackend: API returned {status}: {body}");
            return Err(Self::error(format!("API returned {status}")));
        }

        debug!("OpenAiBackend: received {} bytes", body.len());
        Self::extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_reads_first_choice() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"}}]}"#;
        assert_eq!(OpenAiBackend::extract_text(body).unwrap(), "Hello!");
    }

    #[test]
    fn extract_text_rejects_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let err = OpenAiBackend::extract_text(body).unwrap_err();
        assert_eq!(err.backend(), Some("openai"));
    }

    #[test]
    fn extract_text_rejects_missing_choices() {
        assert!(OpenAiBackend::extract_text(r#"{"choices":[]}"#)
            .unwrap_err()
            .is_model_backend());
    }
}
