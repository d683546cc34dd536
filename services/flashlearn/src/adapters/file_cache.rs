//! services/flashlearn/src/adapters/file_cache.rs
//!
//! A file-backed implementation of the `LocalCache` port. Each key is stored as one
//! JSON file inside the data directory.

use async_trait::async_trait;
use flashlearn_core::ports::{LocalCache, PortError, PortResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A `LocalCache` that persists every key to `{dir}/{key}.json`.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a new `FileCache`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PortError::Unexpected(format!("Invalid cache key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

//=========================================================================================
// `LocalCache` Trait Implementation
//=========================================================================================

#[async_trait]
impl LocalCache for FileCache {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Writes through a temporary file and renames it so a crash never leaves half a value.
    async fn write(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&tmp_path, value)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        assert_eq!(cache.read("flashlearn_study_sets").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_creates_directory_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path().join("nested"));

        cache.write("flashlearn_study_sets", "[1]").await.unwrap();
        cache.write("flashlearn_study_sets", "[1,2]").await.unwrap();

        assert_eq!(
            cache.read("flashlearn_study_sets").await.unwrap().as_deref(),
            Some("[1,2]")
        );
        assert!(!cache.dir().join("flashlearn_study_sets.json.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_keys_that_escape_the_directory() {
        let temp = TempDir::new().unwrap();
        let cache = FileCache::new(temp.path());
        assert!(cache.write("../outside", "x").await.is_err());
        assert!(cache.read("").await.is_err());
    }
}
