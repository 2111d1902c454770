//! User profile entity.

use serde::{Deserialize, Serialize};

/// Public profile of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub user_id: i64,
    pub name: String,
    pub email: Option<String>,
}
