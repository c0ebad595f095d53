use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{checked_limit, ConversationStore, EmbeddingService};
use crate::domain::{DocumentMetadata, DomainError, Embedding, RetrievedDocument, StoredDocument};

#[derive(Default)]
struct Entries {
    /// Document ids in insertion order, used to break score ties.
    order: Vec<String>,
    documents: HashMap<String, StoredDocument>,
    embeddings: HashMap<String, Embedding>,
}

/// Process-local [`ConversationStore`] ranking documents by cosine similarity.
pub struct InMemoryConversationStore {
    embedding_service: Arc<dyn EmbeddingService>,
    entries: Mutex<Entries>,
}

impl InMemoryConversationStore {
    pub fn new(embedding_service: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedding_service,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// All stored documents in insertion order.
    pub async fn documents(&self) -> Vec<StoredDocument> {
        let entries = self.entries.lock().await;
        entries
            .order
            .iter()
            .filter_map(|id| entries.documents.get(id).cloned())
            .collect()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn add(&self, content: &str, metadata: DocumentMetadata) -> Result<String, DomainError> {
        // Embed before taking the lock so the insert itself is a single step.
        let vector = self.embedding_service.embed(content).await?;
        let document = StoredDocument::new(content, metadata);
        let id = document.id().to_string();
        let embedding = Embedding::new(
            id.clone(),
            vector,
            self.embedding_service.config().model_name().to_string(),
        );

        debug!(
            "Embedded document {} ({} dims, {})",
            embedding.document_id(),
            embedding.dimensions(),
            embedding.model()
        );

        let mut entries = self.entries.lock().await;
        entries.order.push(id.clone());
        entries.documents.insert(id.clone(), document);
        entries.embeddings.insert(id.clone(), embedding);

        debug!("Stored document {} ({} total)", id, entries.order.len());
        Ok(id)
    }

    async fn query(&self, text: &str, k: i64) -> Result<Vec<RetrievedDocument>, DomainError> {
        let limit = checked_limit(k)?;
        if limit == 0 {
            return Ok(vec![]);
        }

        {
            let entries = self.entries.lock().await;
            if entries.order.is_empty() {
                return Ok(vec![]);
            }
        }

        let query_embedding = self.embedding_service.embed(text).await?;

        let entries = self.entries.lock().await;
        let mut scored: Vec<(usize, f32)> = entries
            .order
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                entries
                    .embeddings
                    .get(id)
                    .map(|e| (position, cosine_similarity(&query_embedding, e.vector())))
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let results = scored
            .into_iter()
            .take(limit)
            .filter_map(|(position, score)| {
                let document = entries.documents.get(&entries.order[position])?;
                Some(RetrievedDocument::new(
                    document.content(),
                    document.metadata().clone(),
                    score,
                ))
            })
            .collect();

        Ok(results)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let entries = self.entries.lock().await;
        Ok(entries.order.len() as u64)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::HashedEmbedding;

    fn store() -> InMemoryConversationStore {
        InMemoryConversationStore::new(Arc::new(HashedEmbedding::new()))
    }

    #[tokio::test]
    async fn test_query_empty_store_returns_empty() {
        let store = store();

        for k in [0, 1, 5, 100] {
            assert!(store.query("anything", k).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_query_zero_k_returns_empty() {
        let store = store();
        store.add("return policy is 30 days", DocumentMetadata::now()).await.unwrap();

        assert!(store.query("return policy", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_negative_k_is_invalid() {
        let store = store();

        let err = store.query("anything", -1).await.unwrap_err();

        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_query_orders_by_similarity() {
        let store = store();
        store
            .add("shipping to canada costs extra", DocumentMetadata::now())
            .await
            .unwrap();
        store
            .add("our return policy is 30 days", DocumentMetadata::now())
            .await
            .unwrap();
        store
            .add("office hours are nine to five", DocumentMetadata::now())
            .await
            .unwrap();

        let results = store.query("what is the return policy", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content(), "our return policy is 30 days");
        assert!(results[0].score() >= results[1].score());
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids_and_keeps_metadata() {
        let store = store();
        let metadata = DocumentMetadata::new("2024-05-01T10:00:00Z");

        let a = store.add("same text", metadata.clone()).await.unwrap();
        let b = store.add("same text", metadata.clone()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.count().await.unwrap(), 2);
        let documents = store.documents().await;
        assert_eq!(documents[0].id(), a);
        assert_eq!(documents[1].metadata(), &metadata);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = store();
        store.add("first", DocumentMetadata::now()).await.unwrap();
        store.add("second", DocumentMetadata::now()).await.unwrap();

        // A query without tokens embeds to the zero vector; every score is 0.
        let results = store.query("?!", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content(), "first");
        assert_eq!(results[1].content(), "second");
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
