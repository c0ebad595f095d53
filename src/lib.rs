pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatOrchestrator, CheckBackendsUseCase, ConversationStore, EmbeddingService, ModelBackend,
    TurnState,
};

pub use cli::Commands;

pub use connector::{
    create_backend, AnthropicBackend, ChromaConversationStore, Container, ContainerConfig,
    EchoBackend, HashedEmbedding, InMemoryConversationStore, OpenAiBackend, Router,
};

pub use domain::{
    BackendKind, DocumentMetadata, DomainError, MessageLog, ModelConfig, RetrievedDocument, Role,
    StoredDocument, Turn,
};
