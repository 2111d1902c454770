//! # Infovault Repository
//!
//! Generic MySQL access layered as:
//!
//! ```text
//! AccountRepository            (domain interface)
//!   ↓
//! QueryFacade                  (typed read/write entry points)
//!   ↓  Statement
//! QueryExecutor                (worker task + one-shot result channel)
//!   ↓  row stream
//! decoder                      (scalar / single / sequence)
//!   ↓
//! MySQL
//! ```

pub mod decoder;
pub mod executor;
pub mod metrics;
pub mod mysql;
pub mod pool;
pub mod query;
pub mod statement;
pub mod traits;

pub use decoder::PartialRows;
pub use executor::{Outcome, QueryExecutor, Shape};
pub use mysql::*;
pub use pool::*;
pub use query::QueryFacade;
pub use statement::{Param, Statement};
pub use traits::*;
