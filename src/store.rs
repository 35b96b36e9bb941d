//! Raw string-to-string key-value storage.
//!
//! This is the only layer that touches the device's persistent storage.
//! Every repository sits on top of a [`KeyValueStore`]; none of them retry a
//! failed call, so errors from here propagate to the caller untouched.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::metrics::{MetricsTimer, StoreMetrics};

/// Scoped get/set/remove/clear/list over string keys and string values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing what was there
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
    /// Remove every key
    async fn clear(&self) -> Result<()>;
    /// All keys currently stored
    async fn list_keys(&self) -> Result<Vec<String>>;
}

/// Durable store backed by an embedded sled database
pub struct SledStore {
    db: sled::Db,
    flush_on_write: bool,
    metrics: StoreMetrics,
}

impl SledStore {
    /// Open (or create) a store at `path`
    pub fn open(path: &Path, flush_on_write: bool) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        debug!(path = %path.display(), "Opened sled store");
        Ok(Self {
            db,
            flush_on_write,
            metrics: StoreMetrics::default(),
        })
    }

    /// Open a store that is deleted when dropped
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self {
            db,
            flush_on_write: false,
            metrics: StoreMetrics::default(),
        })
    }

    async fn flush(&self) -> Result<()> {
        if self.flush_on_write {
            self.db.flush_async().await?;
        }
        Ok(())
    }

    fn observe<T>(&self, timer: MetricsTimer, result: Result<T>) -> Result<T> {
        timer.finish(result.is_ok());
        result
    }
}

#[async_trait]
impl KeyValueStore for SledStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let timer = MetricsTimer::new(self.metrics, "get");
        let result: Result<Option<String>> = match self.db.get(key.as_bytes()) {
            Ok(Some(bytes)) => String::from_utf8(bytes.to_vec()).map(Some).map_err(Into::into),
            Ok(None) => Ok(None),
            Err(e) => Err(e.into()),
        };
        self.observe(timer, result)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let timer = MetricsTimer::new(self.metrics, "set");
        let result: Result<()> = match self.db.insert(key.as_bytes(), value.as_bytes()) {
            Ok(_) => self.flush().await,
            Err(e) => Err(e.into()),
        };
        self.observe(timer, result)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let timer = MetricsTimer::new(self.metrics, "remove");
        let result: Result<()> = match self.db.remove(key.as_bytes()) {
            Ok(_) => self.flush().await,
            Err(e) => Err(e.into()),
        };
        self.observe(timer, result)
    }

    async fn clear(&self) -> Result<()> {
        let timer = MetricsTimer::new(self.metrics, "clear");
        let result: Result<()> = match self.db.clear() {
            Ok(()) => self.flush().await,
            Err(e) => Err(e.into()),
        };
        self.observe(timer, result)
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let timer = MetricsTimer::new(self.metrics, "list_keys");
        let result = self
            .db
            .iter()
            .keys()
            .map(|key| {
                let key = key?;
                Ok(String::from_utf8_lossy(&key).into_owned())
            })
            .collect::<Result<Vec<_>>>();
        self.observe(timer, result)
    }
}

/// Volatile store used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
