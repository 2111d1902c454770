//! # Infovault Server Library
//!
//! Dependency injection wiring, application assembly, and startup output
//! for the Infovault server.

pub mod app;
pub mod di;
pub mod startup;
