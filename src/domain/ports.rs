use crate::domain::model::University;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A persistent key-value slot holding serialized text.
///
/// `get` returns `Ok(None)` when the key has never been written.
/// Implementations report failures as `StorageReadError` / `StorageWriteError`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait UniversityDirectory: Send + Sync {
    async fn search_by_country(&self, country: &str) -> Result<Vec<University>>;
    async fn fetch_all(&self) -> Result<Vec<University>>;
}
