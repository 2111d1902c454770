//! Redis-backed cache store.

use super::CacheStore;
use infovault_core::{InfoError, InfoResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Keys fetched per `SCAN` round trip.
const SCAN_BATCH: usize = 100;

/// Redis-backed cache store.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool; `None` when Redis is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a store over a Redis pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a store that refuses every operation (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> InfoResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                InfoError::StoreUnavailable(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(InfoError::StoreUnavailable("Redis is disabled".to_string())),
        }
    }
}

/// Creates a Redis pool from a URL.
pub fn create_redis_pool(url: &str, max_size: usize) -> InfoResult<Arc<Pool>> {
    let mut config = deadpool_redis::Config::from_url(url);
    config.pool = Some(deadpool_redis::PoolConfig::new(max_size));
    let pool = config
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| InfoError::Configuration(format!("Failed to create Redis pool: {}", e)))?;
    Ok(Arc::new(pool))
}

/// Escapes glob metacharacters so `SCAN MATCH` treats them literally.
fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> InfoResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            InfoError::StoreUnavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> InfoResult<()> {
        let mut conn = self.get_conn().await?;

        let result = match ttl {
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                conn.pset_ex::<_, _, ()>(key, value, millis).await
            }
            None => conn.set::<_, _, ()>(key, value).await,
        };
        result.map_err(|e| {
            InfoError::StoreUnavailable(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> InfoResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            InfoError::StoreUnavailable(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_prefix(&self, prefix: &str) -> InfoResult<u64> {
        let mut conn = self.get_conn().await?;
        let pattern = format!("{}*", escape_glob(prefix));

        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| InfoError::StoreUnavailable(format!("Failed to scan keys: {}", e)))?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await.map_err(|e| {
                    InfoError::StoreUnavailable(format!("Failed to delete keys: {}", e))
                })?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys with prefix '{}'", deleted, prefix);
        Ok(deleted)
    }

    async fn ping(&self) -> InfoResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| InfoError::StoreUnavailable(format!("Redis ping failed: {}", e)))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_store_is_unavailable() {
        let store = RedisCacheStore::disabled();
        assert!(!store.is_enabled());

        let err = store.get_raw("user:7:function:profile").await.unwrap_err();
        assert!(matches!(err, InfoError::StoreUnavailable(_)));
        let err = store.set_raw("k", "v", None).await.unwrap_err();
        assert!(matches!(err, InfoError::StoreUnavailable(_)));
        assert!(store.delete("k").await.is_err());
        assert!(store.ping().await.is_err());
    }

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("user:a*b:function:"), "user:a\\*b:function:");
        assert_eq!(escape_glob("[x]?"), "\\[x\\]\\?");
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let err = create_redis_pool("not-a-url", 4).unwrap_err();
        assert!(matches!(err, InfoError::Configuration(_)));
    }
}
