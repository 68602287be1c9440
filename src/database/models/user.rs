use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::workflow::Role;

/// Row in `users`. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub name: String,
    pub email: String,
    pub dept: String,
    pub hod_email: String,
    pub force_reset: bool,
}

impl User {
    /// Parsed role. Unknown strings mean the row was edited outside the portal.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Directory listing shown to the superuser
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub username: String,
    pub role: String,
    pub name: String,
    pub dept: String,
}
