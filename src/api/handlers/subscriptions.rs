//! Handlers for subscription CRUD and the stats aggregate.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::subscription::SubscriptionRequest;
use crate::domain::entities::{AuthenticatedUser, Subscription, SubscriptionStats};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's subscriptions.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions`
///
/// The `X-Cache` response header reports `HIT` when the list came from the
/// cache and `MISS` when it was read from the store.
pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<([(&'static str, &'static str); 1], Json<Vec<Subscription>>), AppError> {
    let (subscriptions, source) = state.subscription_service.list_for_user(user.id).await?;

    Ok(([("x-cache", source.as_header_value())], Json(subscriptions)))
}

/// Returns the caller's stats aggregate.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions/stats`
///
/// Sets `X-Cache` like the list endpoint.
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<([(&'static str, &'static str); 1], Json<SubscriptionStats>), AppError> {
    let (stats, source) = state.subscription_service.stats_for_user(user.id).await?;

    Ok(([("x-cache", source.as_header_value())], Json(stats)))
}

/// Fetches one of the caller's subscriptions.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions/{id}`
///
/// # Errors
///
/// Returns 404 Not Found when the record does not exist or belongs to
/// another user.
pub async fn get_subscription_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<Subscription>, AppError> {
    let subscription = state.subscription_service.get(user.id, id).await?;

    Ok(Json(subscription))
}

/// Creates a subscription for the caller.
///
/// # Endpoint
///
/// `POST /api/v1/subscriptions`
pub async fn create_subscription_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    payload.validate()?;

    let created = state
        .subscription_service
        .create(user.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces one of the caller's subscriptions.
///
/// # Endpoint
///
/// `PUT /api/v1/subscriptions/{id}`
pub async fn update_subscription_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<Json<Subscription>, AppError> {
    payload.validate()?;

    let updated = state
        .subscription_service
        .update(user.id, id, payload.into())
        .await?;

    Ok(Json(updated))
}

/// Deletes one of the caller's subscriptions.
///
/// # Endpoint
///
/// `DELETE /api/v1/subscriptions/{id}`
pub async fn delete_subscription_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.subscription_service.delete(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
