//! Process-local cache store.

use super::CacheStore;
use infovault_core::InfoResult;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Minimum time between sweeps of expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-memory cache store for local development and tests.
///
/// Expiry is checked on access. Writes also sweep expired entries, at most
/// once per `SWEEP_INTERVAL`.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
    last_sweep: Mutex<Option<Instant>>,
}

impl MemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    /// Returns true when no live entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_due(&self, now: Instant) -> bool {
        let mut last = self.last_sweep.lock();
        match *last {
            Some(at) if now.duration_since(at) < SWEEP_INTERVAL => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    #[cfg(test)]
    fn stored_len(&self) -> usize {
        self.entries.read().len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> InfoResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => {
                    debug!("Cache hit for key '{}'", key);
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("Cache miss for key '{}'", key);
                    return Ok(None);
                }
            }
        }

        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        debug!("Cache entry '{}' expired", key);
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> InfoResult<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
        };

        let mut entries = self.entries.write();
        if self.sweep_due(now) {
            let before = entries.len();
            entries.retain(|_, e| e.is_live(now));
            let swept = before - entries.len();
            if swept > 0 {
                debug!("Swept {} expired cache entries", swept);
            }
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> InfoResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .remove(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn delete_prefix(&self, prefix: &str) -> InfoResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        let mut live_removed = 0_u64;
        entries.retain(|key, entry| {
            let keep = !key.starts_with(prefix);
            if !keep && entry.is_live(now) {
                live_removed += 1;
            }
            keep
        });
        debug!(
            "Deleted {} keys with prefix '{}'",
            before - entries.len(),
            prefix
        );
        Ok(live_removed)
    }

    async fn ping(&self) -> InfoResult<()> {
        Ok(())
    }
}
