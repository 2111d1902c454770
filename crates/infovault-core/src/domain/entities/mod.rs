//! Domain entities.

mod account;
mod profile;
mod transaction;

pub use account::Account;
pub use profile::Profile;
pub use transaction::Transaction;
