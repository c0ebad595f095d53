use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ModelBackend;

/// Outcome of probing one backend.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    name: String,
    result: Result<String, String>,
}

impl BackendStatus {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(|e| e.as_str())
    }

    pub fn display_line(&self) -> String {
        match &self.result {
            Ok(_) => format!("[ok]    {} connected", self.name),
            Err(e) => format!("[error] {}: {}", self.name, e),
        }
    }
}

/// Use case for checking that each configured model backend answers.
pub struct CheckBackendsUseCase {
    backends: Vec<Arc<dyn ModelBackend>>,
}

impl CheckBackendsUseCase {
    pub fn new(backends: Vec<Arc<dyn ModelBackend>>) -> Self {
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Probe every backend in order. Failures are reported, not propagated.
    pub async fn execute(&self) -> Vec<BackendStatus> {
        let mut statuses = Vec::with_capacity(self.backends.len());

        for backend in &self.backends {
            let result = match backend.probe().await {
                Ok(reply) => {
                    info!("{} probe succeeded", backend.name());
                    Ok(reply)
                }
                Err(e) => {
                    warn!("{} probe failed: {}", backend.name(), e);
                    Err(e.to_string())
                }
            };
            statuses.push(BackendStatus {
                name: backend.name().to_string(),
                result,
            });
        }

        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use async_trait::async_trait;

    struct FixedBackend {
        name: &'static str,
        ok: bool,
    }

    #[async_trait]
    impl ModelBackend for FixedBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, DomainError> {
            assert_eq!(max_tokens, crate::application::PROBE_MAX_TOKENS);
            if self.ok {
                Ok(prompt.to_string())
            } else {
                Err(DomainError::model_backend(self.name, "invalid x-api-key"))
            }
        }
    }

    #[tokio::test]
    async fn test_reports_each_backend_in_order() {
        let use_case = CheckBackendsUseCase::new(vec![
            Arc::new(FixedBackend { name: "anthropic", ok: true }),
            Arc::new(FixedBackend { name: "openai", ok: false }),
        ]);

        let statuses = use_case.execute().await;

        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].is_connected());
        assert_eq!(statuses[0].display_line(), "[ok]    anthropic connected");
        assert!(!statuses[1].is_connected());
        assert!(statuses[1].error().unwrap().contains("invalid x-api-key"));
    }
}
