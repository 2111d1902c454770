//! Account service trait definition.

use crate::dto::{
    AccountResponse, BalanceResponse, ProfileResponse, RecordTransactionRequest,
    RecordTransactionResponse, TransactionListResponse,
};
use infovault_core::{InfoResult, Interface};
use async_trait::async_trait;

/// Account service trait.
#[async_trait]
pub trait AccountService: Interface + Send + Sync {
    /// Gets an account by ID.
    async fn get_account(&self, id: i64) -> InfoResult<AccountResponse>;

    /// Gets the settled balance of an account.
    async fn get_balance(&self, id: i64) -> InfoResult<BalanceResponse>;

    /// Lists the most recent transactions of an account.
    async fn list_transactions(&self, account_id: i64, limit: u32) -> InfoResult<TransactionListResponse>;

    /// Gets a user's profile.
    async fn get_profile(&self, user_id: i64) -> InfoResult<ProfileResponse>;

    /// Records a transaction against an account.
    async fn record_transaction(
        &self,
        account_id: i64,
        request: RecordTransactionRequest,
    ) -> InfoResult<RecordTransactionResponse>;
}
