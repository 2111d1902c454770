//! Profile controller.

use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use infovault_service::ProfileResponse;
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tracing::debug;

/// Creates the user profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/profile", get(get_profile))
}

/// Get a user's profile.
async fn get_profile(State(state): State<AppState>, Path(user_id): Path<i64>) -> ApiResult<ProfileResponse> {
    debug!("Get profile request: {}", user_id);

    let response = state.account_service.get_profile(user_id).await?;
    ok(response)
}
