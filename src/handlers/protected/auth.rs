use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user: User,
    pub force_reset: bool,
}

/// GET /api/auth/whoami
pub async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI {
        force_reset: user.force_reset,
        user,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub password: String,
    pub confirm: String,
}

/// PUT /api/auth/password - replace a temporary (or current) password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<PasswordChange>,
) -> ApiResult<serde_json::Value> {
    state
        .auth()
        .change_password(&user.username, &payload.password, &payload.confirm)
        .await?;
    Ok(ApiResponse::success(serde_json::json!({ "updated": true })))
}
