//! Account controller.

use crate::{
    extractors::{LimitQuery, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use infovault_service::{
    AccountResponse, BalanceResponse, RecordTransactionRequest, RecordTransactionResponse,
    TransactionListResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;

/// Creates the account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_account))
        .route("/:id/balance", get(get_balance))
        .route("/:id/transactions", get(list_transactions).post(record_transaction))
}

/// Get an account by ID.
async fn get_account(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<AccountResponse> {
    debug!("Get account request: {}", id);

    let response = state.account_service.get_account(id).await?;
    ok(response)
}

/// Get the settled balance of an account.
async fn get_balance(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<BalanceResponse> {
    debug!("Get balance request: {}", id);

    let response = state.account_service.get_balance(id).await?;
    ok(response)
}

/// List recent transactions of an account, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<TransactionListResponse> {
    debug!("List transactions request: {}", id);

    let response = state
        .account_service
        .list_transactions(id, query.limit())
        .await?;
    ok(response)
}

/// Record a transaction against an account.
async fn record_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecordTransactionResponse>>), AppError> {
    debug!("Record transaction request: {} for account {}", request.tx_id, id);

    let response = state.account_service.record_transaction(id, request).await?;
    Ok(created(response))
}
