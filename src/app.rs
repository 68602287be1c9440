use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_password_current};
use crate::state::AppState;

/// Build the full router for `state`
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(public::login))
        // Protected API
        .merge(account_routes(state.clone()))
        .merge(api_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    let router = match cors_layer(&state) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Routes an account on a temporary password may still use
fn account_routes(state: AppState) -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/password", put(auth::change_password))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{actions, catalog, payments, queue, reports, requests, users};

    Router::new()
        .route("/api/catalog", get(catalog::catalog))
        // Requests
        .route("/api/requests", get(requests::list_all).post(requests::submit))
        .route("/api/requests/mine", get(requests::mine))
        .route("/api/requests/:id", get(requests::get))
        .route("/api/requests/:id/invoice", get(requests::invoice))
        // Approval actions
        .route("/api/requests/:id/approve", post(actions::approve))
        .route("/api/requests/:id/decline", post(actions::decline))
        .route("/api/requests/:id/issue", post(actions::issue))
        .route("/api/requests/:id/resolve", post(actions::resolve))
        .route("/api/requests/:id/quote", post(actions::quote))
        .route("/api/requests/:id/validate", post(actions::validate))
        .route("/api/queue", get(queue::queue))
        // Accounts
        .route("/api/payments", get(payments::list))
        .route("/api/payments/:id/paid", post(payments::mark_paid))
        // Reports
        .route("/api/reports/savings", get(reports::savings))
        .route("/api/reports/savings.csv", get(reports::savings_csv))
        .route("/api/reports/spend", get(reports::spend))
        // Superuser
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/audit", get(users::audit))
        // Layers run bottom-up: authenticate, then check the password flag
        .route_layer(from_fn(require_password_current))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

/// Connect to the configured database and serve the API until ctrl-c
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let router = app(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Facility 365 Portal listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn cors_layer(state: &AppState) -> Option<CorsLayer> {
    let security = &state.config.security;
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    Some(layer.allow_origin(AllowOrigin::list(origins)))
}
