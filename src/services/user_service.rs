use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::hash_password;
use crate::database::models::{User, UserSummary};
use crate::database::Repository;
use crate::services::auth_service::USER_COLUMNS;
use crate::services::{AuditService, ServiceError};
use crate::workflow::Role;

/// Account details supplied by the superuser
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    /// Temporary password; the user must replace it on first login
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub dept: String,
    #[serde(default)]
    pub hod_email: String,
}

pub struct UserService {
    pool: SqlitePool,
    users: Repository<User>,
    summaries: Repository<UserSummary>,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: Repository::new("users", USER_COLUMNS, pool.clone()),
            summaries: Repository::new("users", "username, role, name, dept", pool.clone()),
            pool,
        }
    }

    pub async fn create_user(&self, created_by: &str, new_user: NewUser) -> Result<UserSummary, ServiceError> {
        let username = new_user.username.trim().to_lowercase();
        if username.is_empty() || new_user.password.is_empty() {
            return Err(ServiceError::Validation("Username and temporary password are required".to_string()));
        }
        if !new_user.role.is_assignable() {
            return Err(ServiceError::Validation(format!("Role '{}' cannot be assigned", new_user.role)));
        }

        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO users (username, password, role, name, email, dept, hod_email, force_reset)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&username)
        .bind(hash_password(&new_user.password))
        .bind(new_user.role.as_str())
        .bind(new_user.name.trim())
        .bind(new_user.email.trim().to_lowercase())
        .bind(new_user.dept.trim())
        .bind(new_user.hod_email.trim().to_lowercase())
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            let err = crate::database::DatabaseError::from(err);
            if err.is_unique_violation() {
                return Err(ServiceError::Conflict("Username exists".to_string()));
            }
            return Err(err.into());
        }

        AuditService::record(
            &mut *tx,
            created_by,
            "User",
            &format!("Created {} ({})", username, new_user.role),
        )
        .await?;
        tx.commit().await?;

        info!("Created user '{}' with role {}", username, new_user.role);
        Ok(self.summaries.select_404("username", &username).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        Ok(self.summaries.select_all("username").await?)
    }

    pub async fn get_user(&self, username: &str) -> Result<User, ServiceError> {
        Ok(self.users.select_404("username", &username.to_lowercase()).await?)
    }
}
