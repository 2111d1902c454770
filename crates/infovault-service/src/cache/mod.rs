//! Caching infrastructure for the service layer.
//!
//! [`CacheFacade`] gives typed JSON access keyed by `(subject, operation)`
//! over a raw [`CacheStore`], backed by Redis in production and by a
//! process-local map in development and tests.

mod cache_facade;
mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_facade::CacheFacade;
pub use cache_interface::CacheStore;
pub use cache_keys::CacheKey;
pub use memory_cache::MemoryCacheStore;
pub use redis_cache::{create_redis_pool, RedisCacheStore, RedisCacheStoreParameters};
