//! Result type aliases for Infovault.

use crate::InfoError;

/// A specialized `Result` type for Infovault operations.
pub type InfoResult<T> = Result<T, InfoError>;
