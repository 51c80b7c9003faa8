use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RekapError, Result};
use crate::model::attendance::Batch;

/// Path segment that resolves to the most recently stored batch.
pub const LATEST: &str = "latest";

/// Short-lived, in-memory home for ingested batches, keyed by batch id.
///
/// Readers get an `Arc` snapshot, so a newer upload never changes a batch
/// someone is already reading. "latest" is last-writer-wins and is held
/// outside the cache, so the newest upload stays readable even when the
/// cache is full.
pub struct BatchStore {
    cache: Cache<Uuid, Arc<Batch>>,
    latest: RwLock<Option<(Uuid, Arc<Batch>)>>,
    ttl: Duration,
}

impl BatchStore {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                // TinyLFU may refuse a brand-new key once full
                .eviction_policy(EvictionPolicy::lru())
                .build(),
            latest: RwLock::new(None),
            ttl,
        }
    }

    pub async fn insert(&self, batch: Batch) -> Uuid {
        let id = Uuid::new_v4();
        let batch = Arc::new(batch);
        self.cache.insert(id, batch.clone()).await;
        *self.latest.write().unwrap_or_else(|e| e.into_inner()) = Some((id, batch));
        debug!(batch_id = %id, "Batch stored");
        id
    }

    fn latest(&self) -> Option<(Uuid, Arc<Batch>)> {
        let latest = self
            .latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        // same expiry as the cache entries
        latest.filter(|(_, batch)| {
            Utc::now()
                .signed_duration_since(batch.created_at)
                .to_std()
                .map_or(true, |age| age < self.ttl)
        })
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Batch>> {
        if let Some(batch) = self.cache.get(id).await {
            return Some(batch);
        }
        self.latest()
            .filter(|(latest_id, _)| latest_id == id)
            .map(|(_, batch)| batch)
    }

    /// Look up by batch id or [`LATEST`]. Unknown, expired and malformed
    /// keys are all "not found".
    pub async fn resolve(&self, key: &str) -> Result<(Uuid, Arc<Batch>)> {
        if key.eq_ignore_ascii_case(LATEST) {
            return self.latest().ok_or(RekapError::BatchNotFound);
        }

        let id = Uuid::parse_str(key).map_err(|_| RekapError::BatchNotFound)?;
        let batch = self.get(&id).await.ok_or(RekapError::BatchNotFound)?;
        Ok((id, batch))
    }
}
