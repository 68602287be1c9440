use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Facility 365 Portal",
            "version": version,
            "description": "Procurement and facility request approval API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "account": "/api/auth/whoami, /api/auth/password",
                "catalog": "/api/catalog",
                "requests": "/api/requests[/:id[/invoice|/approve|/decline|/issue|/resolve|/quote|/validate]]",
                "queue": "/api/queue",
                "payments": "/api/payments[/:id/paid] (Accounts)",
                "reports": "/api/reports/savings[.csv] (SAC), /api/reports/spend (Dept HOD)",
                "users": "/api/users (Superuser)",
                "audit": "/api/audit (Superuser)",
            }
        }
    }))
}

/// GET /health - database liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
