use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, UnifinderError};
use crate::utils::validation::validate_storage_key;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Stores each key as `<base_path>/<key>.json`.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so readers never observe a partially written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_storage_key("key", key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(UnifinderError::StorageReadError {
                key: key.to_string(),
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let write_error = |e: std::io::Error| UnifinderError::StorageWriteError {
            key: key.to_string(),
            message: format!("{}: {}", path.display(), e),
        };

        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(write_error)?;

        let tmp_path = self
            .base_path
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));
        tokio::fs::write(&tmp_path, value.as_bytes())
            .await
            .map_err(write_error)?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(write_error)?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Process-local store; contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_missing_key_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert_eq!(store.get("unifinder_favorites").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trips_and_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("data"));

        store.set("unifinder_favorites", "[1,2,3]").await.unwrap();
        assert_eq!(
            store.get("unifinder_favorites").await.unwrap().as_deref(),
            Some("[1,2,3]")
        );

        store.set("unifinder_favorites", "[]").await.unwrap();
        assert_eq!(
            store.get("unifinder_favorites").await.unwrap().as_deref(),
            Some("[]")
        );

        let on_disk = temp_dir
            .path()
            .join("nested")
            .join("data")
            .join("unifinder_favorites.json");
        assert!(on_disk.exists());
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path().join("nested").join("data"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writes_from_clones_leave_a_complete_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let value = format!("[{}]", vec![i.to_string(); 2000].join(","));
                store.set("unifinder_favorites", &value).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get("unifinder_favorites").await.unwrap().unwrap();
        let values: Vec<u32> = serde_json::from_str(&stored).unwrap();
        assert_eq!(values.len(), 2000);
        assert!(values.iter().all(|v| *v == values[0]));
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(matches!(
            store.set("../escape", "x").await,
            Err(UnifinderError::InvalidConfigValueError { .. })
        ));
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_file_store_write_failure_is_storage_write_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the data directory should be.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = FileStore::new(&blocker);

        let err = store.set("unifinder_favorites", "[]").await.unwrap_err();
        assert!(matches!(err, UnifinderError::StorageWriteError { .. }));
    }

    #[test]
    fn test_memory_store_is_shared_between_clones() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let other = store.clone();

            store.set("k", "v").await.unwrap();
            assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
            assert_eq!(other.raw("missing").await, None);
        });
    }
}
