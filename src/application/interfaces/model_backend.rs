use async_trait::async_trait;

use crate::domain::DomainError;

/// Token budget for connectivity probes.
pub const PROBE_MAX_TOKENS: u32 = 10;

/// A hosted (or local) language model that turns a prompt into a reply.
///
/// Implementors own the vendor wire format. Every failure is reported as
/// [`DomainError::ModelBackend`] carrying [`ModelBackend::name`].
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the reply text.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, DomainError>;

    /// Cheap round trip used to confirm credentials and reachability.
    async fn probe(&self) -> Result<String, DomainError> {
        let prompt = format!("Say '{} test successful' briefly", self.name());
        self.generate(&prompt, PROBE_MAX_TOKENS).await
    }
}
