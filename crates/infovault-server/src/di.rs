//! Dependency injection module using Shaku.
//!
//! The module owns the two shared connection pools. Everything built on top
//! of them (executor, facades, repository, service) is assembled in
//! [`crate::app`] because it depends on runtime configuration.

use infovault_core::{module, HasComponent};
use infovault_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters};
use infovault_service::{CacheStore, RedisCacheStore, RedisCacheStoreParameters};
use deadpool_redis::Pool;
use std::sync::Arc;

module! {
    pub InfovaultModule {
        components = [
            DatabasePool,
            RedisCacheStore,
        ],
        providers = [],
    }
}

/// Builds the module around established pools.
///
/// Without a Redis pool the module's cache store refuses every operation.
pub fn build_module(database: &DatabasePool, redis: Option<Arc<Pool>>) -> Arc<InfovaultModule> {
    let module = InfovaultModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: database.inner().clone(),
        })
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters { pool: redis })
        .build();

    Arc::new(module)
}

/// Resolves shared infrastructure from a module.
pub trait InfrastructureResolver {
    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;

    /// Resolves the Redis cache store.
    fn redis_cache(&self) -> Arc<dyn CacheStore>;
}

impl InfrastructureResolver for InfovaultModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }

    fn redis_cache(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}
