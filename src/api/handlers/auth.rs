//! Handlers for registration, login, token refresh, and profile.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, UserResponse,
};
use crate::application::services::TokenPair;
use crate::domain::entities::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and returns it with an initial token pair.
///
/// # Endpoint
///
/// `POST /api/v1/register`
///
/// # Errors
///
/// - 400 Bad Request on validation failure
/// - 409 Conflict when the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    let (user, tokens) = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            tokens,
        }),
    ))
}

/// Exchanges credentials for a token pair.
///
/// # Endpoint
///
/// `POST /api/v1/login`
///
/// # Errors
///
/// Returns 401 Unauthorized on unknown email or wrong password, with the
/// same body for both so account existence is not revealed.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    payload.validate()?;

    let tokens = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(tokens))
}

/// Exchanges a refresh token for a new token pair.
///
/// # Endpoint
///
/// `POST /api/v1/refresh`
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    payload.validate()?;

    let tokens = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(tokens))
}

/// Returns the authenticated caller's profile.
///
/// # Endpoint
///
/// `GET /api/v1/me`
pub async fn me_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(user.into())
}
