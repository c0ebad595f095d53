use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingConfig};

/// Generates vector embeddings for documents and queries.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
