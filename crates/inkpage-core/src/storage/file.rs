//! File-based storage.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredPage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stores pages as pretty-printed JSON files in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open (and create if missing) a storage directory.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path)
            .map_err(|e| io_error("create storage directory", &base_path, e))?;
        Ok(Self { base_path })
    }

    /// `<base>/<id>.json`, with every character outside `[A-Za-z0-9_-]`
    /// replaced by `_`.
    fn page_path(&self, id: &str) -> PathBuf {
        let file_stem: String = id
            .chars()
            .map(|c| match c {
                c if c.is_alphanumeric() => c,
                '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.base_path.join(format!("{file_stem}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn io_error(action: &str, path: &Path, err: io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {action} {}: {err}", path.display()))
}

/// Write through a sibling temp file so a failed save never truncates the
/// previous version.
fn write_replacing(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

impl Storage for FileStorage {
    fn save(&self, id: &str, page: &StoredPage) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.page_path(id);
        let encoded = page
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()));

        Box::pin(async move {
            let json = encoded?;
            write_replacing(&path, &json).map_err(|e| io_error("write", &path, e))?;
            log::debug!("Saved page to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPage>> {
        let path = self.page_path(id);
        let id = id.to_string();

        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(io_error("read", &path, e)),
            };
            StoredPage::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.page_path(id);

        Box::pin(async move {
            match fs::remove_file(&path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_error("delete", &path, e)),
                _ => Ok(()),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path)
                .map_err(|e| io_error("list", &self.base_path, e))?;

            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.page_path(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}
