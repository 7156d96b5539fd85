//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from the Authorization
/// header and attaches the resolved [`AuthenticatedUser`] as a request
/// extension for downstream handlers.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - the Authorization header is missing or not a Bearer token
/// - the token is invalid, expired, or of the wrong kind
/// - the token's user no longer exists
///
/// Adds `WWW-Authenticate: Bearer` to 401 responses per RFC 6750.
///
/// [`AuthenticatedUser`]: crate::domain::entities::AuthenticatedUser
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let mut req = Request::from_parts(parts, body);

    let user = st.auth_service.authenticate(&token).await?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
