//! Upstream document acquisition collaborator contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use textmill_chunker::Metadata;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported source type: {0}")]
    UnsupportedType(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDescriptor {
    /// Local filesystem path.
    Path { path: String },
    /// HTTP(S) URL.
    Url { url: String },
    /// Cloud storage object.
    Bucket { bucket: String, object: String },
    /// Inline base64-encoded content.
    Blob { content: String, filename: String },
}

/// Decoded text plus the basic metadata the parsing collaborator reports.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub page_count: Option<usize>,
}

impl ExtractedText {
    /// Flatten the extraction metadata into a chunk metadata mapping.
    pub fn base_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert("mime_type".to_string(), Value::from(self.mime_type.clone()));
        meta.insert("size_bytes".to_string(), Value::from(self.size_bytes));
        if let Some(pages) = self.page_count {
            meta.insert("page_count".to_string(), Value::from(pages));
        }
        meta
    }
}

/// Trait for document acquisition + parsing backends (filesystem, HTTP,
/// object storage, managed OCR services).
///
/// Any parsing failure surfaces here as a [`SourceError`] — it never
/// reaches the chunker.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, descriptor: &SourceDescriptor) -> Result<ExtractedText, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serde_roundtrip() {
        let descriptor = SourceDescriptor::Bucket {
            bucket: "docs".to_string(),
            object: "reports/q3.pdf".to_string(),
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains(r#""type":"bucket""#));
        let back: SourceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor, back);
    }

    #[test]
    fn base_metadata_includes_page_count_when_present() {
        let extracted = ExtractedText {
            text: "body".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 1024,
            page_count: Some(3),
        };
        let meta = extracted.base_metadata();
        assert_eq!(meta["mime_type"], Value::from("application/pdf"));
        assert_eq!(meta["page_count"], Value::from(3));

        let no_pages = ExtractedText {
            page_count: None,
            ..extracted
        };
        assert!(!no_pages.base_metadata().contains_key("page_count"));
    }
}
