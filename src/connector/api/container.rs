use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::{
    ChatOrchestrator, CheckBackendsUseCase, ConversationStore, EmbeddingService, ModelBackend,
};
use crate::connector::adapter::{
    create_backend, ChromaConversationStore, HashedEmbedding, InMemoryConversationStore,
};
use crate::domain::{BackendKind, ModelConfig};

pub struct ContainerConfig {
    pub backend: BackendKind,
    /// Overrides the model id read from the environment.
    pub model: Option<String>,
    pub max_tokens: u32,
    pub chroma_url: Option<String>,
    /// ChromaDB collection holding the conversation history.
    pub namespace: String,
    pub context_k: usize,
    /// Upper bound on one turn (context query plus model call).
    pub timeout: Duration,
}

pub struct Container {
    store: Arc<dyn ConversationStore>,
    backend: Arc<dyn ModelBackend>,
    store_description: String,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let embedding_service: Arc<dyn EmbeddingService> = Arc::new(HashedEmbedding::new());

        let (store, store_description): (Arc<dyn ConversationStore>, String) =
            if let Some(chroma_url) = config.chroma_url.as_deref() {
                match ChromaConversationStore::new(
                    chroma_url,
                    &config.namespace,
                    embedding_service.clone(),
                )
                .await
                {
                    Ok(chroma) => {
                        debug!(
                            "Connected to ChromaDB at {} collection {}",
                            chroma_url, config.namespace
                        );
                        (
                            Arc::new(chroma),
                            format!("chromadb ({} / {})", chroma_url, config.namespace),
                        )
                    }
                    Err(e) => {
                        warn!(
                            "Failed to connect to ChromaDB ({}): {}. Falling back to in-memory storage.",
                            chroma_url, e
                        );
                        (
                            Arc::new(InMemoryConversationStore::new(embedding_service)),
                            "memory".to_string(),
                        )
                    }
                }
            } else {
                debug!("Using in-memory conversation store");
                (
                    Arc::new(InMemoryConversationStore::new(embedding_service)),
                    "memory".to_string(),
                )
            };

        let backend = create_backend(Self::model_config(&config, config.backend));

        Ok(Self {
            store,
            backend,
            store_description,
            config,
        })
    }

    fn model_config(config: &ContainerConfig, kind: BackendKind) -> ModelConfig {
        let model_config = ModelConfig::from_env(kind)
            .with_max_tokens(config.max_tokens)
            .with_timeout(config.timeout);

        match config.model.as_deref() {
            Some(model) if kind == config.backend => model_config.with_model_id(model),
            _ => model_config,
        }
    }

    /// A fresh chat session with its own message log, sharing the store.
    pub fn chat_session(&self) -> ChatOrchestrator {
        ChatOrchestrator::new(self.store.clone(), self.backend.clone())
            .with_context_k(self.config.context_k)
            .with_max_tokens(self.config.max_tokens)
    }

    /// Probes every hosted backend, plus the selected one if it is local.
    pub fn check_backends_use_case(&self) -> CheckBackendsUseCase {
        let mut backends: Vec<Arc<dyn ModelBackend>> = BackendKind::ALL
            .into_iter()
            .filter(|kind| kind.is_remote())
            .map(|kind| {
                if kind == self.config.backend {
                    self.backend.clone()
                } else {
                    create_backend(Self::model_config(&self.config, kind))
                }
            })
            .collect();

        if !self.config.backend.is_remote() {
            backends.push(self.backend.clone());
        }

        CheckBackendsUseCase::new(backends)
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn backend(&self) -> BackendKind {
        self.config.backend
    }

    pub fn store_description(&self) -> &str {
        &self.store_description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_config() -> ContainerConfig {
        ContainerConfig {
            backend: BackendKind::Echo,
            model: None,
            max_tokens: 64,
            chroma_url: None,
            namespace: "chat_history".to_string(),
            context_k: 5,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_sessions_share_the_store() {
        let container = Container::new(echo_config()).await.unwrap();

        let mut first = container.chat_session();
        first.submit("remember the blue folder").await.unwrap();

        let second = container.chat_session();
        assert!(second.messages().is_empty());
        assert_eq!(second.store().count().await.unwrap(), 1);
        assert_eq!(container.store_description(), "memory");
    }

    #[tokio::test]
    async fn test_status_covers_remote_backends_and_local_selection() {
        let container = Container::new(echo_config()).await.unwrap();

        let use_case = container.check_backends_use_case();

        assert_eq!(use_case.backend_names(), vec!["anthropic", "openai", "echo"]);
    }
}
