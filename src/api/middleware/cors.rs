//! CORS middleware built from configured origins.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Builds the CORS layer.
///
/// An empty origin list or a single `*` entry allows any origin.
/// Unparseable configured origins are logged and skipped.
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins)
}
