//! # Infovault Core
//!
//! Core types shared by every layer of Infovault: the error taxonomy of the
//! data-access and caching layer, the diagnostic sink used by best-effort
//! reads, logging setup, and the account domain records.

pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use diagnostics::*;
pub use domain::*;
pub use error::*;
pub use result::*;
pub use validation::ValidateExt;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
