//! Account domain records.
//!
//! These are plain data rows: they decode straight from MySQL result sets and
//! serialize to JSON for both the cache and the HTTP API.

pub mod entities;

pub use entities::*;
