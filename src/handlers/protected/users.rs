use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::database::models::{AuditEntry, UserSummary};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::services::NewUser;
use crate::state::AppState;
use crate::workflow::Role;

/// GET /api/users (Superuser)
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<UserSummary>> {
    current.require(&[Role::Superuser])?;
    Ok(ApiResponse::success(state.users().list_users().await?))
}

/// POST /api/users (Superuser) - account starts on a temporary password
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<NewUser>,
) -> ApiResult<UserSummary> {
    current.require(&[Role::Superuser])?;
    let created = state.users().create_user(&current.0.username, payload).await?;
    Ok(ApiResponse::created(created))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<u32>,
}

/// GET /api/audit?limit=N (Superuser)
pub async fn audit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Vec<AuditEntry>> {
    current.require(&[Role::Superuser])?;
    let entries = state.audit().recent(query.limit.unwrap_or(100)).await?;
    Ok(ApiResponse::success(entries))
}
