//! Durable key-value persistence for the checklist core.
//!
//! Everything the app persists goes through [`KeyValueStore`]: a flat
//! mapping from string keys to JSON blobs with no transactions and no
//! queries.  Writes are atomic at the granularity of a single key.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing store refused the operation (quota, simulated outage).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Flat durable string-key → JSON-blob mapping.
///
/// Implementations must make `put` atomic per key: a reader never observes
/// a half-written value, though concurrent writers to the same key race
/// last-writer-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is a no-op success.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read a key and deserialize it. `Ok(None)` when the key is absent.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize a value and write it under `key`.
pub async fn put_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        label: String,
        count: u32,
    }

    #[tokio::test]
    async fn json_roundtrip() {
        let store = MemoryStore::new();
        let record = Record {
            label: "stove".to_string(),
            count: 3,
        };

        put_json(&store, "record", &record).await.unwrap();
        let loaded: Option<Record> = get_json(&store, "record").await.unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn get_json_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Record> = get_json(&store, "absent").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn get_json_corrupt_payload_is_error() {
        let store = MemoryStore::new();
        store.put("record", "{not json").await.unwrap();

        let result: Result<Option<Record>> = get_json(&store, "record").await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
