use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{AuditService, AuthService, PaymentService, ReportService, RequestService, UserService};

/// Shared handler state: the database pool and the configuration it was opened with
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.pool.clone(), self.config.security.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.pool.clone())
    }

    pub fn requests(&self) -> RequestService {
        RequestService::new(self.pool.clone())
    }

    pub fn payments(&self) -> PaymentService {
        PaymentService::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.pool.clone())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.pool.clone())
    }
}
