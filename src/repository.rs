//! Repository pattern for data access
//!
//! Every entity family is one JSON array per namespaced key. A
//! [`JsonCollection`] owns the read-modify-write cycle over that array; the
//! per-entity repositories build on it and add ids, timestamps, ordering and
//! their derived views.
//!
//! There is no locking. Two overlapping writes to the same key both read the
//! old array and the later `set` wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::metrics::StoreMetrics;
use crate::store::KeyValueStore;

/// A persisted record addressable by id
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Unique id within its collection
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.$field
                }
            }
        )*
    };
}

impl_record! {
    crate::models::MoodEntry => id,
    crate::models::JournalEntry => id,
    crate::models::Activity => id,
    crate::models::ActivitySession => id,
    crate::models::ChatMessage => id,
    crate::models::ChatSession => therapist_id,
    crate::models::CommunityMessage => id,
}

/// Read-modify-write access to JSON array collections of one record type
pub struct JsonCollection<T> {
    store: Arc<dyn KeyValueStore>,
    prefix: &'static str,
    metrics: StoreMetrics,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            prefix: self.prefix,
            metrics: self.metrics,
            _record: PhantomData,
        }
    }
}

impl<T: Record> JsonCollection<T> {
    /// Collection stored under `{prefix}:{user}` keys
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: &'static str) -> Self {
        Self {
            store,
            prefix,
            metrics: StoreMetrics::default(),
            _record: PhantomData,
        }
    }

    /// Every record under `key`, in stored order.
    ///
    /// A missing or blank value is an empty collection. So is a value that
    /// fails to decode: the failure is logged and the records in it are lost
    /// on the next write. Only store failures are returned as errors.
    pub async fn load_all(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(key = %key, error = %e, "Malformed collection, treating as empty");
                self.metrics.record_malformed_collection(self.prefix);
                Ok(Vec::new())
            },
        }
    }

    /// Replace the whole collection under `key`
    pub async fn save_all(&self, key: &str, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(key, &raw).await?;
        self.metrics.record_collection_write(self.prefix, records.len());
        debug!(key = %key, count = records.len(), "Collection written");
        Ok(())
    }

    /// Linear scan for `id`
    pub async fn load_by_id(&self, key: &str, id: &str) -> Result<Option<T>> {
        Ok(self.load_all(key).await?.into_iter().find(|r| r.id() == id))
    }

    /// Append `record` and persist; returns the record as stored
    pub async fn insert(&self, key: &str, record: T) -> Result<T> {
        let mut records = self.load_all(key).await?;
        records.push(record.clone());
        self.save_all(key, &records).await?;
        Ok(record)
    }

    /// Apply `apply` to the record with `id` and persist.
    ///
    /// Returns `None` without writing anything when no record matches.
    pub async fn update<F>(&self, key: &str, id: &str, apply: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut T) + Send,
    {
        let mut records = self.load_all(key).await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };

        apply(record);
        let updated = record.clone();
        self.save_all(key, &records).await?;
        Ok(Some(updated))
    }

    /// Remove the record with `id` and persist the remainder.
    ///
    /// Always returns `true`, whether or not anything matched.
    pub async fn delete(&self, key: &str, id: &str) -> Result<bool> {
        let mut records = self.load_all(key).await?;
        records.retain(|r| r.id() != id);
        self.save_all(key, &records).await?;
        Ok(true)
    }

    /// Drop the whole collection under `key`
    pub async fn remove_all(&self, key: &str) -> Result<()> {
        self.store.remove(key).await
    }
}
