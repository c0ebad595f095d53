use async_trait::async_trait;

use crate::domain::{DocumentMetadata, DomainError, RetrievedDocument};

/// Similarity-queryable log of completed conversation turns.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Store a new document and return its generated id.
    ///
    /// Fails only with [`DomainError::Unavailable`] when the backing store
    /// cannot be reached.
    async fn add(&self, content: &str, metadata: DocumentMetadata) -> Result<String, DomainError>;

    /// Return up to `k` stored documents most similar to `text`, most similar first.
    ///
    /// An empty store or `k == 0` yields an empty list. A negative `k` is an
    /// [`DomainError::InvalidArgument`].
    async fn query(&self, text: &str, k: i64) -> Result<Vec<RetrievedDocument>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Validate a caller-supplied result count.
pub fn checked_limit(k: i64) -> Result<usize, DomainError> {
    usize::try_from(k)
        .map_err(|_| DomainError::invalid_argument(format!("k must be >= 0, got {}", k)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_limit_rejects_negative() {
        assert_eq!(checked_limit(0).unwrap(), 0);
        assert_eq!(checked_limit(5).unwrap(), 5);
        assert!(checked_limit(-1).unwrap_err().is_invalid_argument());
    }
}
