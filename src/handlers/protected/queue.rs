use axum::{extract::State, Extension};

use crate::database::models::Request;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /api/queue - requests waiting on the caller's role
pub async fn queue(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Request>> {
    Ok(ApiResponse::success(state.requests().queue(&user).await?))
}
