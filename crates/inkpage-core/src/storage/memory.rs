//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredPage};
use std::collections::HashMap;
use std::sync::RwLock;

/// Pages kept in a map for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStorage {
    pages: RwLock<HashMap<String, StoredPage>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, page: &StoredPage) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let page = page.clone();
        Box::pin(async move {
            let mut pages = self.pages.write().map_err(lock_error)?;
            pages.insert(id, page);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPage>> {
        let id = id.to_string();
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            pages.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut pages = self.pages.write().map_err(lock_error)?;
            pages.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            let mut ids: Vec<String> = pages.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            Ok(pages.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CompositionDocument;
    use pollster::block_on;

    fn page(title: &str) -> StoredPage {
        let mut document = CompositionDocument::new();
        document.metadata.title = title.to_string();
        StoredPage::from_document("ignored", &document)
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        block_on(storage.save("test", &page("Profile"))).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();
        assert_eq!(loaded.title, "Profile");
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_last_write_wins() {
        let storage = MemoryStorage::new();
        block_on(storage.save("p", &page("first"))).unwrap();
        block_on(storage.save("p", &page("second"))).unwrap();
        assert_eq!(block_on(storage.load("p")).unwrap().title, "second");
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &page("x"))).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        block_on(storage.save("doc1", &page("a"))).unwrap();
        block_on(storage.save("doc2", &page("b"))).unwrap();

        block_on(storage.save("doc0", &page("c"))).unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc0", "doc1", "doc2"]);
    }
}
