use axum::extract::State;
use serde::Deserialize;

use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::LoginOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - Authenticate and receive a JWT
///
/// Expected Input:
/// ```json
/// { "username": "super", "password": "123" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "username": "super", "role": "Superuser", ... },
///     "force_reset": false,
///     "expires_in": 604800
///   }
/// }
/// ```
///
/// When `force_reset` is true the token only opens `/api/auth/*` until the
/// password is changed.
pub async fn login(State(state): State<AppState>, ApiJson(payload): ApiJson<LoginRequest>) -> ApiResult<LoginOutcome> {
    let outcome = state.auth().login(&payload.username, &payload.password).await?;
    Ok(ApiResponse::success(outcome))
}
