//! # Infovault Service
//!
//! Account services and the cache layer.
//!
//! Services read through a [`CacheFacade`], which stores JSON under keys of
//! the form `user:{subject}:function:{operation}` in Redis (or in process
//! memory for local runs), and fall back to the repository on a miss.

pub mod account_service;
pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;

pub use account_service::*;
pub use cache::*;
pub use dto::*;
pub use r#impl::*;
