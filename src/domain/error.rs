use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Model backend '{backend}' failed: {cause}")]
    ModelBackend { backend: String, cause: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn model_backend(backend: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::ModelBackend {
            backend: backend.into(),
            cause: cause.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn is_model_backend(&self) -> bool {
        matches!(self, Self::ModelBackend { .. })
    }

    /// Name of the backend that produced a [`DomainError::ModelBackend`].
    pub fn backend(&self) -> Option<&str> {
        match self {
            Self::ModelBackend { backend, .. } => Some(backend),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_backend_error_carries_name_and_cause() {
        let err = DomainError::model_backend("anthropic", "API returned 429");

        assert!(err.is_model_backend());
        assert_eq!(err.backend(), Some("anthropic"));
        assert_eq!(
            err.to_string(),
            "Model backend 'anthropic' failed: API returned 429"
        );
    }

    #[test]
    fn predicates_match_only_their_variant() {
        let err = DomainError::invalid_argument("empty message");
        assert!(err.is_invalid_argument());
        assert!(!err.is_unavailable());
        assert_eq!(err.backend(), None);

        let err = DomainError::unavailable("chroma down");
        assert!(err.is_unavailable());
        assert!(!err.is_model_backend());
    }
}
