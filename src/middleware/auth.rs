use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::workflow::Role;

/// Account behind the bearer token, reloaded from the users table
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Ensure the caller holds one of `roles` and return the matching role
    pub fn require(&self, roles: &[Role]) -> Result<Role, ApiError> {
        match self.0.role() {
            Some(role) if roles.contains(&role) => Ok(role),
            _ => {
                tracing::warn!("User '{}' ({}) denied access", self.0.username, self.0.role);
                Err(ApiError::forbidden(format!("Role '{}' cannot access this resource", self.0.role)))
            }
        }
    }
}

/// JWT authentication middleware that validates tokens and loads the caller
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = validate_jwt(&token, &state.config.security)?;

    let user = state
        .auth()
        .current_user(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token presented for unknown user '{}'", claims.sub);
            ApiError::unauthorized("User no longer exists")
        })?;

    // A role change invalidates tokens issued under the old role
    if user.role != claims.role {
        tracing::warn!(
            "Token role '{}' doesn't match database role '{}' for '{}'",
            claims.role,
            user.role,
            user.username
        );
        return Err(ApiError::forbidden("User role changed, please log in again"));
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Blocks accounts still on a temporary password. Runs after [`jwt_auth_middleware`].
pub async fn require_password_current(request: Request, next: Next) -> Result<Response, ApiError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?;

    if current.0.force_reset {
        return Err(ApiError::PasswordResetRequired(
            "Temporary password must be changed before continuing".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
