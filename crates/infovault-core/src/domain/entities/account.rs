//! Account entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A balance-holding account owned by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Auto-increment identifier.
    pub id: i64,

    /// Owning user.
    pub user_id: i64,

    /// Display name of the account.
    pub name: String,

    /// Balance in minor units.
    pub balance: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns true for the zero value returned by best-effort reads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Account::default().is_empty());
        let account = Account {
            id: 42,
            balance: 100,
            ..Account::default()
        };
        assert!(!account.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let account = Account {
            id: 42,
            user_id: 7,
            name: "savings".to_string(),
            balance: 100,
            created_at: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["balance"], 100);
        assert_eq!(json["name"], "savings");
    }
}
