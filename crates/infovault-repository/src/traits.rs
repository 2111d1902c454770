//! Repository trait definitions.

use infovault_core::{Account, InfoResult, Interface, Profile, Transaction};
use async_trait::async_trait;

/// Account repository trait.
#[async_trait]
pub trait AccountRepository: Interface + Send + Sync {
    /// Finds an account by ID. Fails with `NotFound` when absent.
    async fn find_account(&self, id: i64) -> InfoResult<Account>;

    /// Lists the accounts owned by a user.
    async fn find_accounts_by_user(&self, user_id: i64) -> InfoResult<Vec<Account>>;

    /// Reads the settled balance of an account.
    async fn balance(&self, id: i64) -> InfoResult<i64>;

    /// Finds the profile of a user.
    async fn find_profile(&self, user_id: i64) -> InfoResult<Profile>;

    /// Lists the most recent transactions of an account, newest first.
    async fn find_transactions(&self, account_id: i64, limit: u32) -> InfoResult<Vec<Transaction>>;

    /// Counts transactions of an account. Answers 0 when the count cannot be read.
    async fn count_transactions(&self, account_id: i64) -> i64;

    /// Records a transaction and returns its generated ID.
    async fn record_transaction(&self, transaction: &NewTransaction) -> InfoResult<u64>;
}

/// Input for [`AccountRepository::record_transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: i64,
    pub tx_id: String,
    pub amount: i64,
    pub memo: Option<String>,
}
