use std::sync::Arc;

use async_trait::async_trait;
use chromadb::client::{ChromaAuthMethod, ChromaClient, ChromaClientOptions};
use chromadb::collection::{CollectionEntries, QueryOptions};
use chromadb::ChromaCollection;
use serde_json::Map;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{checked_limit, ConversationStore, EmbeddingService};
use crate::domain::{DocumentMetadata, DomainError, RetrievedDocument, StoredDocument};

pub const DEFAULT_COLLECTION: &str = "chat_history";
const TIMESTAMP_KEY: &str = "timestamp";

/// [`ConversationStore`] backed by a ChromaDB collection.
///
/// Embeddings are computed locally and sent with each document, so the
/// collection never needs a server-side embedding function.
pub struct ChromaConversationStore {
    #[allow(dead_code)]
    client: ChromaClient,
    collection: Arc<Mutex<ChromaCollection>>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl ChromaConversationStore {
    pub async fn new(
        url: &str,
        collection_name: &str,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Result<Self, DomainError> {
        let client = ChromaClient::new(ChromaClientOptions {
            url: Some(url.to_string()),
            database: "default_database".to_string(),
            auth: ChromaAuthMethod::None,
        })
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to connect to ChromaDB: {}", e)))?;

        debug!("Connected to ChromaDB at {}", url);

        let collection = client
            .get_or_create_collection(collection_name, None)
            .await
            .map_err(|e| {
                DomainError::unavailable(format!("Failed to get/create collection: {}", e))
            })?;

        debug!("Using ChromaDB collection: {}", collection_name);

        Ok(Self {
            client,
            collection: Arc::new(Mutex::new(collection)),
            embedding_service,
        })
    }

    fn create_metadata(metadata: &DocumentMetadata) -> Map<String, serde_json::Value> {
        let mut map = Map::new();
        map.insert(
            TIMESTAMP_KEY.to_string(),
            serde_json::Value::String(metadata.timestamp.clone()),
        );
        map
    }

    fn metadata_from_map(map: Option<&Map<String, serde_json::Value>>) -> DocumentMetadata {
        let timestamp = map
            .and_then(|m| m.get(TIMESTAMP_KEY))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        DocumentMetadata::new(timestamp)
    }

    /// Convert a Chroma distance (smaller is closer) into a similarity score.
    fn score_from_distance(distance: f32) -> f32 {
        1.0 / (1.0 + distance)
    }
}

#[async_trait]
impl ConversationStore for ChromaConversationStore {
    async fn add(&self, content: &str, metadata: DocumentMetadata) -> Result<String, DomainError> {
        let vector = self.embedding_service.embed(content).await?;
        let document = StoredDocument::new(content, metadata);

        let entries = CollectionEntries {
            ids: vec![document.id()],
            embeddings: Some(vec![vector]),
            metadatas: Some(vec![Self::create_metadata(document.metadata())]),
            documents: Some(vec![document.content()]),
        };

        let collection = self.collection.lock().await;
        collection
            .add(entries, None)
            .await
            .map_err(|e| DomainError::unavailable(format!("Failed to add document: {}", e)))?;

        debug!("Saved document {} to ChromaDB", document.id());
        Ok(document.id().to_string())
    }

    async fn query(&self, text: &str, k: i64) -> Result<Vec<RetrievedDocument>, DomainError> {
        let limit = checked_limit(k)?;
        if limit == 0 || self.count().await? == 0 {
            return Ok(vec![]);
        }

        let query_embedding = self.embedding_service.embed(text).await?;
        let collection = self.collection.lock().await;

        let query_options = QueryOptions {
            query_texts: None,
            query_embeddings: Some(vec![query_embedding]),
            where_metadata: None,
            where_document: None,
            n_results: Some(limit),
            include: Some(vec!["distances", "metadatas", "documents"]),
        };

        let result = collection
            .query(query_options, None)
            .await
            .map_err(|e| DomainError::unavailable(format!("Failed to query documents: {}", e)))?;

        let distances = result
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = result
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let documents = result
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        let mut retrieved: Vec<RetrievedDocument> = documents
            .into_iter()
            .zip(distances)
            .enumerate()
            .map(|(i, (content, distance))| {
                let metadata = Self::metadata_from_map(metadatas.get(i).and_then(|m| m.as_ref()));
                RetrievedDocument::new(content, metadata, Self::score_from_distance(distance))
            })
            .collect();

        retrieved.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        retrieved.truncate(limit);

        Ok(retrieved)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let collection = self.collection.lock().await;
        let result = collection
            .count()
            .await
            .map_err(|e| DomainError::unavailable(format!("Failed to count documents: {}", e)))?;
        Ok(result as u64)
    }
}
