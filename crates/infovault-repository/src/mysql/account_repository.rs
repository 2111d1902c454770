//! MySQL account repository implementation.

use crate::query::QueryFacade;
use crate::statement::Statement;
use crate::traits::{AccountRepository, NewTransaction};
use infovault_core::{Account, InfoResult, Profile, Transaction};
use async_trait::async_trait;
use tracing::debug;

/// MySQL account repository implementation.
#[derive(Clone, Debug)]
pub struct MySqlAccountRepository {
    facade: QueryFacade,
}

impl MySqlAccountRepository {
    /// Creates a new MySQL account repository.
    #[must_use]
    pub fn new(facade: QueryFacade) -> Self {
        Self { facade }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_account(&self, id: i64) -> InfoResult<Account> {
        debug!("Finding account by id: {}", id);

        self.facade
            .read_struct(
                &Statement::new(
                    r#"
                    SELECT id, user_id, name, balance, created_at
                    FROM accounts
                    WHERE id = ?
                    "#,
                )
                .bind(id),
            )
            .await
    }

    async fn find_accounts_by_user(&self, user_id: i64) -> InfoResult<Vec<Account>> {
        debug!("Finding accounts for user: {}", user_id);

        self.facade
            .read_sequence(
                &Statement::new(
                    r#"
                    SELECT id, user_id, name, balance, created_at
                    FROM accounts
                    WHERE user_id = ?
                    ORDER BY id
                    "#,
                )
                .bind(user_id),
            )
            .await
    }

    async fn balance(&self, id: i64) -> InfoResult<i64> {
        self.facade
            .read_value(&Statement::new("SELECT balance FROM accounts WHERE id = ?").bind(id))
            .await
    }

    async fn find_profile(&self, user_id: i64) -> InfoResult<Profile> {
        debug!("Finding profile for user: {}", user_id);

        self.facade
            .read_struct(
                &Statement::new("SELECT user_id, name, email FROM profiles WHERE user_id = ?")
                    .bind(user_id),
            )
            .await
    }

    async fn find_transactions(&self, account_id: i64, limit: u32) -> InfoResult<Vec<Transaction>> {
        debug!("Finding transactions for account: {}, limit: {}", account_id, limit);

        self.facade
            .read_sequence(
                &Statement::new(
                    r#"
                    SELECT id, account_id, tx_id, amount, memo, created_at
                    FROM transactions
                    WHERE account_id = ?
                    ORDER BY id DESC
                    LIMIT ?
                    "#,
                )
                .bind(account_id)
                .bind(limit),
            )
            .await
    }

    async fn count_transactions(&self, account_id: i64) -> i64 {
        self.facade
            .read_value_or_default(
                &Statement::new("SELECT COUNT(*) FROM transactions WHERE account_id = ?")
                    .bind(account_id),
            )
            .await
    }

    async fn record_transaction(&self, transaction: &NewTransaction) -> InfoResult<u64> {
        debug!(
            "Recording transaction {} for account: {}",
            transaction.tx_id, transaction.account_id
        );

        self.facade
            .write(
                &Statement::new(
                    r#"
                    INSERT INTO transactions (account_id, tx_id, amount, memo)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(transaction.account_id)
                .bind(transaction.tx_id.as_str())
                .bind(transaction.amount)
                .bind(transaction.memo.clone()),
            )
            .await
    }
}
