//! Cache of reconciled history listings
//!
//! Keyed by `(calculator type, user)`. An entry is served while it is fresh:
//! younger than the TTL and not invalidated by a write. Each invalidation
//! bumps a generation counter so a fetch that started before a write cannot
//! store its outdated listing as fresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::{CalculatorType, HistoryEntry};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub calculator_type: CalculatorType,
    pub user_id: String,
}

impl CacheKey {
    pub fn new(calculator_type: CalculatorType, user_id: impl Into<String>) -> Self {
        Self {
            calculator_type,
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    entries: Option<Vec<HistoryEntry>>,
    fetched_at: Option<Instant>,
    stale: bool,
    generation: u64,
}

#[derive(Clone)]
pub struct HistoryCache {
    slots: Arc<RwLock<HashMap<CacheKey, Slot>>>,
    ttl: Duration,
}

impl HistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Fresh listing for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<HistoryEntry>> {
        let slots = self.slots.read().await;
        let slot = slots.get(key)?;
        let fetched_at = slot.fetched_at?;
        if slot.stale || fetched_at.elapsed() >= self.ttl {
            return None;
        }
        tracing::debug!(calculator_type = %key.calculator_type, "History cache hit");
        slot.entries.clone()
    }

    /// Generation to pass back to [`HistoryCache::put`] after fetching
    pub async fn generation(&self, key: &CacheKey) -> u64 {
        self.slots
            .read()
            .await
            .get(key)
            .map(|slot| slot.generation)
            .unwrap_or(0)
    }

    /// Store a listing fetched at `generation`; dropped if invalidated since
    pub async fn put(&self, key: CacheKey, entries: Vec<HistoryEntry>, generation: u64) -> bool {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(key).or_default();
        if slot.generation != generation {
            return false;
        }
        slot.entries = Some(entries);
        slot.fetched_at = Some(Instant::now());
        slot.stale = false;
        true
    }

    /// Mark `key` stale so the next read refetches
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(key.clone()).or_default();
        slot.stale = true;
        slot.generation += 1;
        tracing::debug!(
            calculator_type = %key.calculator_type,
            generation = slot.generation,
            "History cache invalidated"
        );
    }

    pub async fn is_fresh(&self, key: &CacheKey) -> bool {
        self.get(key).await.is_some()
    }

    /// Last listing for `key` regardless of freshness
    pub async fn peek(&self, key: &CacheKey) -> Option<Vec<HistoryEntry>> {
        self.slots
            .read()
            .await
            .get(key)
            .and_then(|slot| slot.entries.clone())
    }
}
