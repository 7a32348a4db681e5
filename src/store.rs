use crate::{error::Result, models::payment::PendingPaymentIntent};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Single-owner repository for the pending payment collection.
///
/// The collection is read-modify-written as a whole by one reconciling caller at
/// a time; implementations do not need to merge concurrent writers.
#[async_trait]
pub trait PendingPaymentStore: Send + Sync {
    /// Load the full collection. A store that has never been written loads as empty.
    async fn load(&self) -> Result<Vec<PendingPaymentIntent>>;

    /// Replace the full collection.
    async fn save(&self, intents: &[PendingPaymentIntent]) -> Result<()>;
}

/// Durable store backed by a single JSON file (the value under the
/// "@pending_payments" key in the original storage layout).
pub struct FilePaymentStore {
    path: PathBuf,
}

impl FilePaymentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PendingPaymentStore for FilePaymentStore {
    async fn load(&self) -> Result<Vec<PendingPaymentIntent>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, intents: &[PendingPaymentIntent]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec(intents)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryPaymentStore {
    intents: Mutex<Vec<PendingPaymentIntent>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingPaymentStore for MemoryPaymentStore {
    async fn load(&self) -> Result<Vec<PendingPaymentIntent>> {
        Ok(self.intents.lock().await.clone())
    }

    async fn save(&self, intents: &[PendingPaymentIntent]) -> Result<()> {
        *self.intents.lock().await = intents.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_roundtrips_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePaymentStore::new(dir.path().join("pending_payments.json"));

        let intents = vec![
            PendingPaymentIntent::new("ord_1", "course_A"),
            PendingPaymentIntent::new("ord_2", "course_B"),
        ];
        store.save(&intents).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, intents);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePaymentStore::new(dir.path().join("nope.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending_payments.json");
        tokio::fs::write(&path, b"not json{{").await.unwrap();

        let store = FilePaymentStore::new(&path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePaymentStore::new(dir.path().join("nested/state/pending.json"));

        store
            .save(&[PendingPaymentIntent::new("ord_1", "course_A")])
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
