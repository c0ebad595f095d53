use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

/// Deterministic bag-of-words embedding that runs fully offline.
///
/// Each lowercase token seeds an RNG that yields a pseudo-random direction;
/// the directions are summed and normalised. Texts that share words end up
/// with a higher cosine similarity, which is enough to rank prior turns by
/// lexical overlap without loading a model.
pub struct HashedEmbedding {
    config: EmbeddingConfig,
}

impl HashedEmbedding {
    pub fn new() -> Self {
        Self {
            config: EmbeddingConfig::new("hashed-embedding", 384),
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            config: EmbeddingConfig::new("hashed-embedding", dimensions),
        }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
    }

    fn token_direction(&self, token: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let seed = hasher.finish();

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..self.config.dimensions())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.config.dimensions()];

        for token in Self::tokens(text) {
            for (acc, x) in vector.iter_mut().zip(self.token_direction(&token)) {
                *acc += x;
            }
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }
}

impl Default for HashedEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for HashedEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vector = self.generate_embedding(text);
        debug!(
            "Generated hashed embedding with {} dimensions for {} chars",
            vector.len(),
            text.len()
        );
        Ok(vector)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_hashed_embedding_consistency() {
        let service = HashedEmbedding::new();

        let embedding1 = service.embed("hello world").await.unwrap();
        let embedding2 = service.embed("Hello, WORLD!").await.unwrap();

        assert_eq!(embedding1, embedding2);
    }

    #[tokio::test]
    async fn test_hashed_embedding_dimensions() {
        let service = HashedEmbedding::with_dimensions(128);

        let embedding = service.embed("test").await.unwrap();

        assert_eq!(embedding.len(), 128);
    }

    #[tokio::test]
    async fn test_hashed_embedding_normalized() {
        let service = HashedEmbedding::new();

        let embedding = service.embed("return policy").await.unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

        assert!((magnitude - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let service = HashedEmbedding::with_dimensions(16);

        let embedding = service.embed("  ?! ").await.unwrap();

        assert!(embedding.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_shared_words_score_higher() {
        let service = HashedEmbedding::new();

        let query = service.embed("what is the return policy").await.unwrap();
        let related = service.embed("return policy is 30 days").await.unwrap();
        let unrelated = service.embed("shipping to canada costs extra").await.unwrap();

        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }
}
