//! Page persistence.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::{CompositionDocument, LoadReport, PageMetadata};
use crate::persisted::PersistedDocument;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A page record as exchanged with the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPage {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub document: PersistedDocument,
}

impl StoredPage {
    /// Snapshot `document` under `id`. New pages start unpublished.
    pub fn from_document(id: impl Into<String>, document: &CompositionDocument) -> Self {
        Self {
            id: id.into(),
            title: document.metadata.title.clone(),
            description: document.metadata.description.clone(),
            published: false,
            document: document.serialize(),
        }
    }

    /// Rebuild the in-memory document, metadata included.
    pub fn to_document(&self) -> (CompositionDocument, LoadReport) {
        let (mut document, report) = CompositionDocument::deserialize(&self.document);
        document.metadata = PageMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
        };
        (document, report)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a stored page, or a bare persisted document wrapped as an
    /// untitled, unpublished page.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("document").is_some() {
            serde_json::from_value(value)
        } else {
            let document: PersistedDocument = serde_json::from_value(value)?;
            Ok(Self {
                id: String::new(),
                title: PageMetadata::default().title,
                description: None,
                published: false,
                document,
            })
        }
    }
}

/// Trait for page storage backends.
pub trait Storage: Send + Sync {
    /// Save a page under `id`, replacing any previous version.
    fn save(&self, id: &str, page: &StoredPage) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a page.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPage>>;

    /// Delete a page.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all page IDs in sorted order.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a page exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    #[test]
    fn test_stored_page_carries_metadata() {
        let mut document = CompositionDocument::new();
        document.metadata.title = "My links".to_string();
        document.add_element(ElementKind::Link, None).unwrap();
        let page = StoredPage::from_document("p1", &document);
        assert!(!page.published);

        let (restored, report) = page.to_document();
        assert!(report.is_clean());
        assert_eq!(restored.metadata.title, "My links");
        assert_eq!(restored.elements(), document.elements());
    }

    #[test]
    fn test_from_json_accepts_bare_document() {
        let page = StoredPage::from_json(
            r##"{"background": {"type": "color", "value": "#ffffff"}, "elements": []}"##,
        )
        .unwrap();
        assert!(!page.published);
        assert_eq!(page.document.background.as_ref().map(|b| b.kind.as_str()), Some("color"));
    }

    #[test]
    fn test_from_json_stored_page() {
        let page = StoredPage::from_json(
            r#"{"id": "7", "title": "Hi", "published": true, "document": {"elements": []}}"#,
        )
        .unwrap();
        assert!(page.published);
        assert_eq!(page.title, "Hi");
    }
}
