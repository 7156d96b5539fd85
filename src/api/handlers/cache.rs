//! Handler for the cache management endpoint.

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use tracing::info;

use crate::domain::entities::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub status: &'static str,
    pub user_id: i64,
}

/// Drops the caller's cached subscription list and stats.
///
/// # Endpoint
///
/// `POST /api/v1/cache/clear`
///
/// The next list or stats read repopulates the cache from the store.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<CacheClearResponse> {
    state.subscription_cache.invalidate_user(user.id).await;
    info!(user_id = user.id, "Cache cleared by user request");

    Json(CacheClearResponse {
        status: "cleared",
        user_id: user.id,
    })
}
