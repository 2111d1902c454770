//! Account transaction entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single credit (positive amount) or debit (negative amount).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    /// Auto-increment identifier.
    pub id: i64,

    /// Account the amount was applied to.
    pub account_id: i64,

    /// External transaction identifier; unique per account.
    pub tx_id: String,

    /// Signed amount in minor units.
    pub amount: i64,

    /// Free-text memo.
    pub memo: Option<String>,

    /// Time the transaction was recorded.
    pub created_at: DateTime<Utc>,
}
