use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{SavingsReport, SpendReport};
use crate::state::AppState;
use crate::workflow::Role;

/// GET /api/reports/savings - SAC negotiated savings
pub async fn savings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<SavingsReport> {
    current.require(&[Role::Sac])?;
    Ok(ApiResponse::success(state.reports().savings().await?))
}

/// GET /api/reports/savings.csv
pub async fn savings_csv(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    current.require(&[Role::Sac])?;
    let csv = state.reports().savings_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"savings.csv\""),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/reports/spend - approved and paid spend for the HOD's department
pub async fn spend(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<SpendReport> {
    current.require(&[Role::DeptHod])?;
    Ok(ApiResponse::success(state.reports().spend(&current.0.dept).await?))
}
