use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Extension,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::services::ActionOutcome;
use crate::state::AppState;
use crate::workflow::{Action, CostReview, Quote};

async fn apply(state: &AppState, current: &CurrentUser, id: &str, action: Action) -> ApiResult<ActionOutcome> {
    let outcome = state.requests().act(&current.0, id, action).await?;
    Ok(ApiResponse::success(outcome))
}

/// POST /api/requests/:id/approve - Dept HOD, SS HOD, ED, GMD
pub async fn approve(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<ActionOutcome> {
    apply(&state, &current, &id, Action::Approve).await
}

/// POST /api/requests/:id/decline - Dept HOD, SS HOD, ED, GMD
pub async fn decline(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<ActionOutcome> {
    apply(&state, &current, &id, Action::Decline).await
}

/// POST /api/requests/:id/issue - Admin hands stationary out of the store
pub async fn issue(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<ActionOutcome> {
    apply(&state, &current, &id, Action::Issue).await
}

/// POST /api/requests/:id/resolve - Admin closes a CUG issue at no cost
pub async fn resolve(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<ActionOutcome> {
    apply(&state, &current, &id, Action::Resolve).await
}

#[derive(Debug, Deserialize)]
pub struct ValidateCost {
    pub amount: f64,
    #[serde(default)]
    pub note: String,
}

/// POST /api/requests/:id/validate - SAC records the negotiated cost
pub async fn validate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ValidateCost>,
) -> ApiResult<ActionOutcome> {
    let review = CostReview {
        amount: payload.amount,
        note: payload.note,
    };
    apply(&state, &current, &id, Action::Validate(review)).await
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Invoice exceeds the upload limit".to_string())
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// POST /api/requests/:id/quote - Admin attaches vendor, cost and invoice
///
/// Multipart fields: `vendor` (text), `cost` (number), `invoice` (file).
pub async fn quote(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<ActionOutcome> {
    let mut vendor = String::new();
    let mut cost = None;
    let mut invoice = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "vendor" => vendor = field.text().await.map_err(multipart_error)?,
            "cost" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ApiError::field_error("cost", format!("'{}' is not a number", raw.trim())))?;
                cost = Some(parsed);
            }
            "invoice" => invoice = field.bytes().await.map_err(multipart_error)?.to_vec(),
            _ => {}
        }
    }

    let cost = cost.ok_or_else(|| ApiError::field_error("cost", "Cost is required"))?;
    let quote = Quote { vendor, cost, invoice };
    apply(&state, &current, &id, Action::Quote(quote)).await
}
