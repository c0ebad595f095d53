use async_trait::async_trait;

use crate::application::ModelBackend;
use crate::domain::DomainError;

/// Offline backend that answers with the user's message.
///
/// Retrieved context is stripped, so the reply is the last line of the prompt.
/// Handy for exercising retrieval without API credentials.
#[derive(Debug, Default)]
pub struct EchoBackend;

impl EchoBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, DomainError> {
        let last_line = prompt.lines().last().unwrap_or_default().trim();
        Ok(format!("You said: {}", last_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_replies_with_last_line() {
        let backend = EchoBackend::new();

        let reply = backend
            .generate("Relevant previous conversation:\nold\n\n---\n\nnew question", 16)
            .await
            .unwrap();

        assert_eq!(reply, "You said: new question");
    }

    #[tokio::test]
    async fn test_echo_probe_succeeds() {
        assert!(EchoBackend::new().probe().await.is_ok());
    }
}
