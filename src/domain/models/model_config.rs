use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// The family of language-model API a backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Anthropic,
    OpenAi,
    /// Offline backend that needs no credentials.
    Echo,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Anthropic, BackendKind::OpenAi, BackendKind::Echo];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Anthropic => "anthropic",
            BackendKind::OpenAi => "openai",
            BackendKind::Echo => "echo",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(BackendKind::Anthropic),
            "openai" | "gpt" => Ok(BackendKind::OpenAi),
            "echo" => Ok(BackendKind::Echo),
            unknown => Err(DomainError::invalid_argument(format!(
                "Unknown backend '{}', expected one of: anthropic, openai, echo",
                unknown
            ))),
        }
    }

    /// Whether the backend talks to a hosted API that needs credentials.
    pub fn is_remote(&self) -> bool {
        !matches!(self, BackendKind::Echo)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection and generation settings for one model backend.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    kind: BackendKind,
    model_id: String,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    timeout: Duration,
}

impl ModelConfig {
    pub fn new(kind: BackendKind, model_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = match kind {
            BackendKind::Anthropic => DEFAULT_ANTHROPIC_BASE_URL,
            BackendKind::OpenAi => DEFAULT_OPENAI_BASE_URL,
            BackendKind::Echo => "",
        };
        Self {
            kind,
            model_id: model_id.into(),
            api_key: api_key.into(),
            base_url: base_url.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable             | Default                    |
    /// |----------------------|----------------------------|
    /// | `ANTHROPIC_API_KEY`  | `""` (empty)               |
    /// | `ANTHROPIC_MODEL`    | `claude-3-sonnet-20240229` |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com`|
    /// | `OPENAI_API_KEY`     | `""` (empty)               |
    /// | `OPENAI_MODEL`       | `gpt-3.5-turbo`            |
    /// | `OPENAI_BASE_URL`    | `https://api.openai.com`   |
    pub fn from_env(kind: BackendKind) -> Self {
        let (prefix, default_model) = match kind {
            BackendKind::Anthropic => ("ANTHROPIC", DEFAULT_ANTHROPIC_MODEL),
            BackendKind::OpenAi => ("OPENAI", DEFAULT_OPENAI_MODEL),
            BackendKind::Echo => return Self::new(kind, "echo", ""),
        };

        let key = std::env::var(format!("{prefix}_API_KEY")).unwrap_or_default();
        let model = std::env::var(format!("{prefix}_MODEL"))
            .unwrap_or_else(|_| default_model.to_string());
        let config = Self::new(kind, model, key);

        match std::env::var(format!("{prefix}_BASE_URL")) {
            Ok(base) => config.with_base_url(base),
            Err(_) => config,
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn summary(&self) -> String {
        format!(
            "backend={}, model={}, max_tokens={}",
            self.kind, self.model_id, self.max_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse_aliases() {
        assert_eq!(BackendKind::parse("Claude").unwrap(), BackendKind::Anthropic);
        assert_eq!(BackendKind::parse("gpt").unwrap(), BackendKind::OpenAi);
        assert_eq!(BackendKind::parse(" echo ").unwrap(), BackendKind::Echo);
        assert!(BackendKind::parse("llama").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::new(BackendKind::OpenAi, "gpt-3.5-turbo", "sk-test");

        assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(config.base_url(), DEFAULT_OPENAI_BASE_URL);
        assert!(config.has_api_key());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ModelConfig::new(BackendKind::Anthropic, "m", "")
            .with_base_url("http://localhost:1234/");

        assert_eq!(config.base_url(), "http://localhost:1234");
        assert!(!config.has_api_key());
    }
}
