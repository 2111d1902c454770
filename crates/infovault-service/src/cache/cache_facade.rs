//! Typed, namespaced access to a [`CacheStore`].

use super::cache_keys::{subject_prefix, CacheKey};
use super::CacheStore;
use crate::metrics::CacheMetrics;
use infovault_config::CacheConfig;
use infovault_core::{InfoError, InfoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// JSON cache keyed by `(subject, operation)`.
#[derive(Clone)]
pub struct CacheFacade {
    store: Arc<dyn CacheStore>,
    default_ttl: Option<Duration>,
}

impl CacheFacade {
    /// Creates a facade over `store`.
    ///
    /// `default_ttl` is what callers pass to [`get_or_load`](Self::get_or_load)
    /// when they have no better expiry.
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Option<Duration>) -> Self {
        Self { store, default_ttl }
    }

    /// Creates a facade using the configured default TTL.
    pub fn from_config(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.default_ttl())
    }

    /// Returns the default TTL.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Stores `value` under `(subject, operation)`, replacing any previous value.
    pub async fn put<T>(
        &self,
        subject: &str,
        operation: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> InfoResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let key = CacheKey::new(subject, operation);
        let json = serde_json::to_string(value)
            .map_err(|e| InfoError::SerializeFailed(format!("{}: {}", key, e)))?;
        self.store.set_raw(key.as_str(), &json, ttl).await
    }

    /// Reads the value stored under `(subject, operation)`.
    ///
    /// Fails with `KeyNotFound` when nothing is stored and with
    /// `DeserializeFailed` when the stored text does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, subject: &str, operation: &str) -> InfoResult<T> {
        let key = CacheKey::new(subject, operation);
        match self.store.get_raw(key.as_str()).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| InfoError::DeserializeFailed(format!("{}: {}", key, e))),
            None => Err(InfoError::KeyNotFound(key.to_string())),
        }
    }

    /// Reads a cached sequence.
    pub async fn get_sequence<T: DeserializeOwned>(
        &self,
        subject: &str,
        operation: &str,
    ) -> InfoResult<Vec<T>> {
        self.get::<Vec<T>>(subject, operation).await
    }

    /// Removes the entry for `(subject, operation)`. A missing entry is not an error.
    pub async fn delete(&self, subject: &str, operation: &str) -> InfoResult<()> {
        let key = CacheKey::new(subject, operation);
        self.store.delete(key.as_str()).await?;
        Ok(())
    }

    /// Removes every entry cached for `subject`.
    pub async fn invalidate_subject(&self, subject: &str) -> InfoResult<u64> {
        let removed = self.store.delete_prefix(&subject_prefix(subject)).await?;
        debug!(subject, removed, "Invalidated cached entries");
        Ok(removed)
    }

    /// Cache-aside read.
    ///
    /// Any cache failure counts as a miss and falls through to `loader`.
    /// Loader errors are returned unchanged; failing to store the loaded
    /// value is logged and otherwise ignored.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        subject: &str,
        operation: &str,
        ttl: Option<Duration>,
        loader: F,
    ) -> InfoResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = InfoResult<T>> + Send,
    {
        match self.get::<T>(subject, operation).await {
            Ok(value) => {
                CacheMetrics::hit(operation);
                return Ok(value);
            }
            Err(InfoError::KeyNotFound(key)) => {
                CacheMetrics::miss(operation);
                debug!("Cache miss for key '{}'", key);
            }
            Err(e) => {
                CacheMetrics::error(operation, e.error_code());
                warn!(subject, operation, "Cache read failed, loading from source: {}", e);
            }
        }

        let value = loader().await?;

        if let Err(e) = self.put(subject, operation, &value, ttl).await {
            CacheMetrics::error(operation, e.error_code());
            warn!(subject, operation, "Failed to cache loaded value: {}", e);
        }

        Ok(value)
    }
}

impl std::fmt::Debug for CacheFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheFacade")
            .field("enabled", &self.store.is_enabled())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
