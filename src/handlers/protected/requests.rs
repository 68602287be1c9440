use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::database::models::{Request, RequestHistory};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;
use crate::workflow::{CartItem, Role};

#[derive(Debug, Deserialize)]
pub struct SubmitCart {
    pub items: Vec<CartItem>,
}

/// POST /api/requests - submit a cart (Staff)
pub async fn submit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<SubmitCart>,
) -> ApiResult<Vec<Request>> {
    current.require(&[Role::Staff])?;
    let created = state.requests().submit_cart(&current.0, &payload.items).await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/requests/mine - the caller's own submissions
pub async fn mine(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<RequestHistory>> {
    Ok(ApiResponse::success(state.requests().history(&user).await?))
}

/// GET /api/requests - every request (Admin analysis)
pub async fn list_all(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<Request>> {
    current.require(&[Role::Admin])?;
    Ok(ApiResponse::success(state.requests().list_all().await?))
}

/// GET /api/requests/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Request> {
    Ok(ApiResponse::success(state.requests().get(&user, &id).await?))
}

/// GET /api/requests/:id/invoice - raw invoice bytes
pub async fn invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.requests().invoice(&user, &id).await?;
    Ok(([(header::CONTENT_TYPE, sniff_content_type(&bytes))], bytes).into_response())
}

fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'%', b'P', b'D', b'F', ..] => "application/pdf",
        _ => "application/octet-stream",
    }
}
