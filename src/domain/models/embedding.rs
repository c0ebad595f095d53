use serde::{Deserialize, Serialize};

/// Represents a vector embedding for a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    document_id: String,
    vector: Vec<f32>,
    model: String,
}

impl Embedding {
    pub fn new(document_id: String, vector: Vec<f32>, model: String) -> Self {
        Self {
            document_id,
            vector,
            model,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// Configuration for the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    model_name: String,
    dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(model_name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimensions,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::new("hashed-embedding", 384)
    }
}
