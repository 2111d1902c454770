//! Raw key-value store behind the cache facade.

use infovault_core::InfoResult;
use async_trait::async_trait;
use shaku::Interface;
use std::time::Duration;

/// Raw string store used by [`CacheFacade`](super::CacheFacade).
///
/// Implementations hold JSON text only; typing and key derivation live in
/// the facade. Every failure to reach the store is reported as
/// `StoreUnavailable`.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Gets the text stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> InfoResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// With `ttl` the entry expires after that duration; without it the
    /// entry lives until deleted.
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> InfoResult<()>;

    /// Deletes a key.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> InfoResult<bool>;

    /// Deletes every key starting with `prefix`.
    ///
    /// Returns the number of keys deleted.
    async fn delete_prefix(&self, prefix: &str) -> InfoResult<u64>;

    /// Checks that the store answers.
    async fn ping(&self) -> InfoResult<()>;

    /// Check if the store is enabled.
    fn is_enabled(&self) -> bool;
}
