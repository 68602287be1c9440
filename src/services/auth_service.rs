use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::Repository;
use crate::services::{AuditService, ServiceError};

pub const USER_COLUMNS: &str = "username, password, role, name, email, dept, hod_email, force_reset";

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
    /// The account still carries a temporary password
    pub force_reset: bool,
    pub expires_in: u64,
}

pub struct AuthService {
    pool: SqlitePool,
    users: Repository<User>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(pool: SqlitePool, security: SecurityConfig) -> Self {
        Self {
            users: Repository::new("users", USER_COLUMNS, pool.clone()),
            pool,
            security,
        }
    }

    /// Check credentials and issue a token. Usernames are case-insensitive.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ServiceError> {
        let username = username.trim().to_lowercase();

        let user = match self.users.select_one("username", &username).await? {
            Some(user) if verify_password(password, &user.password) => user,
            _ => {
                warn!("Rejected login for '{}'", username);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let claims = Claims::new(user.username.clone(), user.role.clone(), self.security.jwt_expiry_hours);
        let token = generate_jwt(&claims, &self.security)?;

        AuditService::new(self.pool.clone()).log(&user.username, "Login", "Success").await?;
        info!("User '{}' logged in as {}", user.username, user.role);

        Ok(LoginOutcome {
            token,
            force_reset: user.force_reset,
            expires_in: self.security.jwt_expiry_hours * 3600,
            user,
        })
    }

    /// Replace the password and clear the temporary-password flag
    pub async fn change_password(&self, username: &str, password: &str, confirm: &str) -> Result<(), ServiceError> {
        if password.is_empty() || password != confirm {
            return Err(ServiceError::Validation("Passwords mismatch.".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE users SET password = ?, force_reset = 0 WHERE username = ?")
            .bind(hash_password(password))
            .bind(username)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(ServiceError::NotFound(format!("User '{}' not found", username)));
        }
        AuditService::record(&mut *tx, username, "Password", "Changed").await?;
        tx.commit().await?;

        info!("Password changed for '{}'", username);
        Ok(())
    }

    /// Reload the account behind a token
    pub async fn current_user(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users.select_one("username", username).await?)
    }
}
