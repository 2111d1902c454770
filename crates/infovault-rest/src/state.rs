//! Application state for Axum handlers.

use infovault_repository::DatabasePoolInterface;
use infovault_service::{AccountService, CacheStore};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountService>,
    pub database: Arc<dyn DatabasePoolInterface>,
    pub cache: Arc<dyn CacheStore>,
    pub version: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        account_service: Arc<dyn AccountService>,
        database: Arc<dyn DatabasePoolInterface>,
        cache: Arc<dyn CacheStore>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            account_service,
            database,
            cache,
            version: version.into(),
        }
    }
}
