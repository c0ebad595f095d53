use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ModelBackend;
use crate::connector::adapter::{AnthropicBackend, EchoBackend, OpenAiBackend};
use crate::domain::{BackendKind, ModelConfig};

/// Build the backend named by `config.kind()`.
///
/// This is the only place that branches on backend identity.
pub fn create_backend(config: ModelConfig) -> Arc<dyn ModelBackend> {
    if config.kind().is_remote() && !config.has_api_key() {
        warn!(
            "No API key configured for {}; requests will only succeed against servers that do not require one",
            config.kind()
        );
    }

    debug!("Creating model backend ({})", config.summary());

    match config.kind() {
        BackendKind::Anthropic => Arc::new(AnthropicBackend::new(config)),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::new(config)),
        BackendKind::Echo => Arc::new(EchoBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_backend_by_kind() {
        for kind in BackendKind::ALL {
            let backend = create_backend(ModelConfig::new(kind, "model", "key"));
            assert_eq!(backend.name(), kind.as_str());
        }
    }
}
