//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`  - Health check: DB and cache (public)
//! - `/api/v1/*`    - REST API; `register`/`login`/`refresh` are public,
//!   everything else requires a Bearer token
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Origins from configuration
//! - **Authentication** - Bearer token on protected routes
//! - **Path normalization** - Trailing slash handling

use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, cors, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, cors_allowed_origins: &[String]) -> NormalizePath<Router> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = api::routes::public_routes().merge(protected);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(cors::layer(cors_allowed_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
