//! Data transfer objects for the account API.

mod account_dto;

pub use account_dto::*;
