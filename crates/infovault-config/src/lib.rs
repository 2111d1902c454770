//! # Infovault Config
//!
//! Configuration management for Infovault.
//! Supports layered configuration from files and environment variables,
//! and runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
