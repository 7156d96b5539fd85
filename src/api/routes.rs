//! API route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    clear_cache_handler, create_subscription_handler, delete_subscription_handler,
    get_subscription_handler, list_subscriptions_handler, login_handler, me_handler,
    refresh_handler, register_handler, stats_handler, update_subscription_handler,
};
use crate::state::AppState;

/// Routes reachable without a token.
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login`    - Exchange credentials for tokens
/// - `POST /refresh`  - Exchange a refresh token for new tokens
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
}

/// Routes requiring Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /me`                   - Caller's profile
/// - `GET    /subscriptions`        - List subscriptions (`X-Cache` header)
/// - `POST   /subscriptions`        - Create a subscription
/// - `GET    /subscriptions/stats`  - Stats aggregate (`X-Cache` header)
/// - `GET    /subscriptions/{id}`   - Fetch one subscription
/// - `PUT    /subscriptions/{id}`   - Replace a subscription
/// - `DELETE /subscriptions/{id}`   - Delete a subscription
/// - `POST   /cache/clear`          - Drop the caller's cache entries
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/subscriptions",
            get(list_subscriptions_handler).post(create_subscription_handler),
        )
        .route("/subscriptions/stats", get(stats_handler))
        .route(
            "/subscriptions/{id}",
            get(get_subscription_handler)
                .put(update_subscription_handler)
                .delete(delete_subscription_handler),
        )
        .route("/cache/clear", post(clear_cache_handler))
}
