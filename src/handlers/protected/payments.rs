use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::{Payment, PaymentTask};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;
use crate::workflow::Role;

/// GET /api/payments - payments ready for Accounts
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<PaymentTask>> {
    current.require(&[Role::Accounts])?;
    Ok(ApiResponse::success(state.payments().ready_payments().await?))
}

/// POST /api/payments/:id/paid
pub async fn mark_paid(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(payment_id): Path<String>,
) -> ApiResult<Payment> {
    current.require(&[Role::Accounts])?;
    let payment = state.payments().mark_paid(&current.0.username, &payment_id).await?;
    Ok(ApiResponse::success(payment))
}
