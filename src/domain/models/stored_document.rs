use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stored alongside each conversation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// RFC 3339 timestamp of when the turn completed.
    pub timestamp: String,
}

impl DocumentMetadata {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self::new(time.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

/// A completed (user, assistant) turn pair persisted for later retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    id: String,
    content: String,
    metadata: DocumentMetadata,
}

impl StoredDocument {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }
}

/// A document returned by a similarity query. Higher score means more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    content: String,
    metadata: DocumentMetadata,
    score: f32,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata, score: f32) -> Self {
        Self {
            content: content.into(),
            metadata,
            score,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn display_line(&self) -> String {
        format!("{} (score: {:.3})", self.content, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_documents_get_unique_ids() {
        let a = StoredDocument::new("a", DocumentMetadata::now());
        let b = StoredDocument::new("a", DocumentMetadata::now());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_metadata_timestamp_is_rfc3339() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let metadata = DocumentMetadata::at(time);
        assert_eq!(metadata.timestamp, "2024-03-01T12:30:00.000000Z");
    }
}
