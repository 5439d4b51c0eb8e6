//! Directory-backed store, one JSON file per key
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a crash never leaves a half-written dictionary behind.

use crate::error::{SlingonError, SlingonResult};
use crate::store::DictionaryStore;
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`
    ///
    /// Keys become file names, so anything that could escape the directory is
    /// refused.
    pub fn path_for(&self, key: &str) -> SlingonResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid {
            return Err(SlingonError::StoreUnavailable(format!(
                "key '{}' cannot be used as a file name",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn read_value(path: &Path) -> SlingonResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SlingonError::StoreUnavailable(format!(
            "failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn write_value(dir: &Path, path: &Path, value: &str) -> SlingonResult<()> {
    let unavailable = |e: std::io::Error| {
        SlingonError::StoreUnavailable(format!("failed to write '{}': {}", path.display(), e))
    };

    fs::create_dir_all(dir).map_err(unavailable)?;
    let mut temp_file = NamedTempFile::new_in(dir).map_err(unavailable)?;
    temp_file.write_all(value.as_bytes()).map_err(unavailable)?;
    temp_file.flush().map_err(unavailable)?;
    temp_file.persist(path).map_err(|e| unavailable(e.error))?;
    Ok(())
}

#[async_trait]
impl DictionaryStore for FileStore {
    async fn get(&self, key: &str) -> SlingonResult<Option<String>> {
        let path = self.path_for(key)?;
        tokio::task::spawn_blocking(move || read_value(&path))
            .await
            .map_err(|e| SlingonError::StoreUnavailable(format!("read task failed: {}", e)))?
    }

    async fn set(&self, key: &str, value: &str) -> SlingonResult<()> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || write_value(&dir, &path, &value))
            .await
            .map_err(|e| SlingonError::StoreUnavailable(format!("write task failed: {}", e)))?
    }

    fn store_name(&self) -> &str {
        "File Store"
    }
}
