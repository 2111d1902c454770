//! Custom Axum extractors.

mod limit;
mod validated;

pub use limit::*;
pub use validated::*;
