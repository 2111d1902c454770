//! Account-related DTOs.

use chrono::{DateTime, Utc};
use infovault_core::validation::rules;
use infovault_core::{Account, Profile, Transaction};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            name: account.name,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Balance response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account_id: i64,
    pub balance: i64,
}

/// Transaction response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub tx_id: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            tx_id: tx.tx_id,
            amount: tx.amount,
            memo: tx.memo,
            created_at: tx.created_at,
        }
    }
}

/// Recent transactions of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub account_id: i64,
    pub transactions: Vec<TransactionResponse>,
    /// Total number of transactions on the account; 0 when unknown.
    pub total: i64,
}

/// Profile response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            email: profile.email,
        }
    }
}

/// Request to record a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordTransactionRequest {
    #[validate(
        length(max = 128, message = "tx_id cannot exceed 128 characters"),
        custom(function = "rules::not_blank")
    )]
    pub tx_id: String,

    #[validate(custom(function = "rules::non_zero"))]
    pub amount: i64,

    #[validate(length(max = 512, message = "memo cannot exceed 512 characters"))]
    pub memo: Option<String>,
}

/// Response to a recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransactionResponse {
    pub id: u64,
    pub account_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use infovault_core::ValidateExt;

    #[test]
    fn test_record_request_validation() {
        let valid = RecordTransactionRequest {
            tx_id: "tx-1".to_string(),
            amount: -20,
            memo: None,
        };
        assert!(valid.validate_request().is_ok());

        let blank = RecordTransactionRequest {
            tx_id: " ".to_string(),
            ..valid.clone()
        };
        assert!(blank.validate_request().is_err());

        let zero = RecordTransactionRequest { amount: 0, ..valid };
        assert!(zero.validate_request().is_err());
    }

    #[test]
    fn test_transaction_response_omits_empty_memo() {
        let response = TransactionResponse::from(Transaction {
            id: 1,
            tx_id: "tx-1".to_string(),
            amount: 5,
            ..Transaction::default()
        });
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("memo").is_none());
        assert_eq!(json["tx_id"], "tx-1");
    }
}
