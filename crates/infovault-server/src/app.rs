//! Application assembly.

use crate::di::{build_module, InfovaultModule, InfrastructureResolver};
use infovault_config::AppConfig;
use infovault_core::{InfoError, InfoResult, TracingSink};
use infovault_repository::{
    DatabasePool, DatabasePoolInterface, MySqlAccountRepository, QueryExecutor, QueryFacade,
};
use infovault_rest::{create_router, AppState};
use infovault_service::{
    create_redis_pool, AccountService, AccountServiceImpl, CacheFacade, CacheStore,
    MemoryCacheStore,
};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// A fully wired server ready to accept connections.
pub struct Application {
    config: AppConfig,
    module: Arc<InfovaultModule>,
    state: AppState,
}

impl Application {
    /// Connects to MySQL and Redis and wires every layer.
    ///
    /// Failing to establish the MySQL pool is fatal. A Redis pool is only
    /// created when Redis is enabled; otherwise cache entries live in
    /// process memory.
    pub async fn build(config: AppConfig) -> InfoResult<Self> {
        let database = DatabasePool::connect(&config.database).await?;
        database.run_migrations().await?;

        let redis = if config.redis.enabled {
            Some(create_redis_pool(&config.redis.url, config.redis.pool_size)?)
        } else {
            None
        };

        let module = build_module(&database, redis);
        let state = Self::assemble(&config, &module);

        Ok(Self {
            config,
            module,
            state,
        })
    }

    fn assemble(config: &AppConfig, module: &InfovaultModule) -> AppState {
        let database = module.database_pool();
        let cache: Arc<dyn CacheStore> = if config.redis.enabled {
            module.redis_cache()
        } else {
            info!("Redis disabled, caching in process memory");
            Arc::new(MemoryCacheStore::new())
        };

        let sink = TracingSink::new(config.logging.suppressed_patterns.clone()).shared();
        let executor = QueryExecutor::from_config(&config.executor);
        let facade = QueryFacade::new(database.as_ref(), executor, sink);

        let repository = Arc::new(MySqlAccountRepository::new(facade));
        let account_service: Arc<dyn AccountService> = Arc::new(AccountServiceImpl::new(
            repository,
            CacheFacade::from_config(Arc::clone(&cache), &config.cache),
        ));

        AppState::new(account_service, database, cache, config.app.version.clone())
    }

    /// Returns the HTTP router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config.server)
    }

    /// Serves HTTP until `shutdown` resolves, then closes the database pool.
    pub async fn run<F>(self, shutdown: F) -> InfoResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| InfoError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        info!("Starting REST server on http://{}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| InfoError::Internal(format!("REST server error: {}", e)))?;

        self.module.database_pool().close().await;
        info!("Server shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

    fn module() -> Arc<InfovaultModule> {
        let pool = MySqlPoolOptions::new()
            .connect_lazy_with(MySqlConnectOptions::new().host("127.0.0.1").port(1));
        build_module(&DatabasePool::with_pool(pool), None)
    }

    #[tokio::test]
    async fn test_disabled_redis_uses_memory_cache() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;

        let state = Application::assemble(&config, &module());
        assert!(state.cache.is_enabled());
        assert!(state.cache.ping().await.is_ok());
        assert_eq!(state.version, config.app.version);
    }

    #[tokio::test]
    async fn test_enabled_redis_resolves_module_store() {
        let config = AppConfig::default();

        let state = Application::assemble(&config, &module());
        assert!(!state.cache.is_enabled());
    }
}
