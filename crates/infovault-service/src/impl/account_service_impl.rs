//! Account service implementation.

use crate::account_service::AccountService;
use crate::cache::CacheFacade;
use crate::dto::{
    AccountResponse, BalanceResponse, ProfileResponse, RecordTransactionRequest,
    RecordTransactionResponse, TransactionListResponse, TransactionResponse,
};
use infovault_core::{InfoResult, Transaction, ValidateExt};
use infovault_repository::{AccountRepository, NewTransaction};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ACCOUNT_OPERATION: &str = "account";
const BALANCE_OPERATION: &str = "balance";
const PROFILE_OPERATION: &str = "profile";

fn account_subject(id: i64) -> String {
    format!("account-{}", id)
}

fn user_subject(user_id: i64) -> String {
    user_id.to_string()
}

fn transactions_operation(limit: u32) -> String {
    format!("transactions-{}", limit)
}

/// Account service with cache-aside reads.
///
/// Reads try the cache first and fall back to the repository on any cache
/// failure. Writes go to the repository and then drop every cached entry
/// of the account.
pub struct AccountServiceImpl {
    repository: Arc<dyn AccountRepository>,
    cache: CacheFacade,
}

impl AccountServiceImpl {
    /// Creates a new account service.
    pub fn new(repository: Arc<dyn AccountRepository>, cache: CacheFacade) -> Self {
        Self { repository, cache }
    }

    async fn invalidate_account(&self, account_id: i64) {
        if let Err(e) = self.cache.invalidate_subject(&account_subject(account_id)).await {
            warn!("Failed to invalidate cache for account {}: {}", account_id, e);
        }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn get_account(&self, id: i64) -> InfoResult<AccountResponse> {
        debug!("Getting account: {}", id);

        let account = self
            .cache
            .get_or_load(
                &account_subject(id),
                ACCOUNT_OPERATION,
                self.cache.default_ttl(),
                || self.repository.find_account(id),
            )
            .await?;

        Ok(AccountResponse::from(account))
    }

    async fn get_balance(&self, id: i64) -> InfoResult<BalanceResponse> {
        debug!("Getting balance of account: {}", id);

        let balance = self
            .cache
            .get_or_load(
                &account_subject(id),
                BALANCE_OPERATION,
                self.cache.default_ttl(),
                || self.repository.balance(id),
            )
            .await?;

        Ok(BalanceResponse {
            account_id: id,
            balance,
        })
    }

    async fn list_transactions(&self, account_id: i64, limit: u32) -> InfoResult<TransactionListResponse> {
        debug!("Listing transactions of account: {}, limit: {}", account_id, limit);

        let subject = account_subject(account_id);
        let operation = transactions_operation(limit);

        let transactions = match self.cache.get_sequence::<Transaction>(&subject, &operation).await {
            Ok(cached) => cached,
            Err(e) => {
                debug!("Transactions of account {} not cached: {}", account_id, e);
                self.repository.find_account(account_id).await?;
                let loaded = self.repository.find_transactions(account_id, limit).await?;
                if let Err(e) = self
                    .cache
                    .put(&subject, &operation, &loaded, self.cache.default_ttl())
                    .await
                {
                    warn!("Failed to cache transactions of account {}: {}", account_id, e);
                }
                loaded
            }
        };

        let total = self.repository.count_transactions(account_id).await;

        Ok(TransactionListResponse {
            account_id,
            transactions: transactions.into_iter().map(TransactionResponse::from).collect(),
            total,
        })
    }

    async fn get_profile(&self, user_id: i64) -> InfoResult<ProfileResponse> {
        debug!("Getting profile of user: {}", user_id);

        let profile = self
            .cache
            .get_or_load(
                &user_subject(user_id),
                PROFILE_OPERATION,
                self.cache.default_ttl(),
                || self.repository.find_profile(user_id),
            )
            .await?;

        Ok(ProfileResponse::from(profile))
    }

    async fn record_transaction(
        &self,
        account_id: i64,
        request: RecordTransactionRequest,
    ) -> InfoResult<RecordTransactionResponse> {
        debug!("Recording transaction {} for account: {}", request.tx_id, account_id);

        request.validate_request()?;

        self.repository.find_account(account_id).await?;

        let id = self
            .repository
            .record_transaction(&NewTransaction {
                account_id,
                tx_id: request.tx_id,
                amount: request.amount,
                memo: request.memo,
            })
            .await?;

        self.invalidate_account(account_id).await;

        info!("Transaction {} recorded for account {}", id, account_id);
        Ok(RecordTransactionResponse { id, account_id })
    }
}

impl std::fmt::Debug for AccountServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCacheStore, RedisCacheStore};
    use chrono::{DateTime, Utc};
    use infovault_core::{Account, InfoError, Profile};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Repository {}

        #[async_trait]
        impl AccountRepository for Repository {
            async fn find_account(&self, id: i64) -> InfoResult<Account>;
            async fn find_accounts_by_user(&self, user_id: i64) -> InfoResult<Vec<Account>>;
            async fn balance(&self, id: i64) -> InfoResult<i64>;
            async fn find_profile(&self, user_id: i64) -> InfoResult<Profile>;
            async fn find_transactions(&self, account_id: i64, limit: u32) -> InfoResult<Vec<Transaction>>;
            async fn count_transactions(&self, account_id: i64) -> i64;
            async fn record_transaction(&self, transaction: &NewTransaction) -> InfoResult<u64>;
        }
    }

    fn account(id: i64) -> Account {
        Account {
            id,
            user_id: 7,
            name: "savings".to_string(),
            balance: 100,
            created_at: DateTime::<Utc>::default(),
        }
    }

    fn transaction(id: i64, account_id: i64) -> Transaction {
        Transaction {
            id,
            account_id,
            tx_id: format!("tx-{}", id),
            amount: 10,
            memo: None,
            created_at: DateTime::<Utc>::default(),
        }
    }

    fn service_with(repository: MockRepository, store: Arc<dyn CacheStore>) -> AccountServiceImpl {
        AccountServiceImpl::new(Arc::new(repository), CacheFacade::new(store, None))
    }

    fn service(repository: MockRepository) -> AccountServiceImpl {
        service_with(repository, Arc::new(MemoryCacheStore::new()))
    }

    #[tokio::test]
    async fn test_get_account_is_cached() {
        let mut repository = MockRepository::new();
        repository
            .expect_find_account()
            .with(eq(42))
            .times(1)
            .returning(|id| Ok(account(id)));

        let service = service(repository);
        let first = service.get_account(42).await.unwrap();
        let second = service.get_account(42).await.unwrap();

        assert_eq!(first.id, 42);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repository = MockRepository::new();
        repository
            .expect_find_account()
            .returning(|_| Err(InfoError::not_found("statement returned no rows")));

        let err = service(repository).get_account(999).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unavailable_cache_falls_back_to_repository() {
        let mut repository = MockRepository::new();
        repository.expect_balance().times(2).returning(|_| Ok(100));

        let service = service_with(repository, Arc::new(RedisCacheStore::disabled()));
        assert_eq!(service.get_balance(42).await.unwrap().balance, 100);
        assert_eq!(service.get_balance(42).await.unwrap().balance, 100);
    }

    #[tokio::test]
    async fn test_get_profile_is_cached() {
        let mut repository = MockRepository::new();
        repository.expect_find_profile().times(1).returning(|user_id| {
            Ok(Profile {
                user_id,
                name: "Ann".to_string(),
                email: Some("ann@example.com".to_string()),
            })
        });

        let service = service(repository);
        service.get_profile(7).await.unwrap();
        let profile = service.get_profile(7).await.unwrap();
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.email.as_deref(), Some("ann@example.com"));
    }

    #[tokio::test]
    async fn test_list_transactions_caches_rows() {
        let mut repository = MockRepository::new();
        repository.expect_find_account().times(1).returning(|id| Ok(account(id)));
        repository
            .expect_find_transactions()
            .with(eq(42), eq(2))
            .times(1)
            .returning(|account_id, _| Ok(vec![transaction(2, account_id), transaction(1, account_id)]));
        repository.expect_count_transactions().returning(|_| 5);

        let service = service(repository);
        service.list_transactions(42, 2).await.unwrap();
        let list = service.list_transactions(42, 2).await.unwrap();

        assert_eq!(list.account_id, 42);
        assert_eq!(list.total, 5);
        let ids: Vec<i64> = list.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_record_transaction_invalidates_account_entries() {
        let mut repository = MockRepository::new();
        repository.expect_find_account().returning(|id| Ok(account(id)));
        repository.expect_balance().times(2).returning(|_| Ok(100));
        repository
            .expect_record_transaction()
            .withf(|t| t.account_id == 42 && t.tx_id == "tx-9" && t.amount == -25)
            .times(1)
            .returning(|_| Ok(9));

        let service = service(repository);
        service.get_balance(42).await.unwrap();

        let recorded = service
            .record_transaction(
                42,
                RecordTransactionRequest {
                    tx_id: "tx-9".to_string(),
                    amount: -25,
                    memo: Some("coffee".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(recorded, RecordTransactionResponse { id: 9, account_id: 42 });

        // The cached balance was dropped, so this reloads.
        service.get_balance(42).await.unwrap();
    }

    #[tokio::test]
    async fn test_record_transaction_rejects_invalid_request() {
        let repository = MockRepository::new();

        let err = service(repository)
            .record_transaction(
                42,
                RecordTransactionRequest {
                    tx_id: "  ".to_string(),
                    amount: 0,
                    memo: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InfoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_record_transaction_for_missing_account() {
        let mut repository = MockRepository::new();
        repository
            .expect_find_account()
            .returning(|_| Err(InfoError::not_found("statement returned no rows")));

        let err = service(repository)
            .record_transaction(
                404,
                RecordTransactionRequest {
                    tx_id: "tx-1".to_string(),
                    amount: 5,
                    memo: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
