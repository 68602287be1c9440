use chrono::Local;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::database::models::AuditEntry;
use crate::database::DatabaseError;

pub struct AuditService {
    pool: SqlitePool,
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an audit row. Takes any executor so callers can log inside the
    /// transaction that performed the change.
    pub async fn record<'e, E>(executor: E, user: &str, action: &str, details: &str) -> Result<(), DatabaseError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        sqlx::query("INSERT INTO audit (timestamp, user, action, details) VALUES (?, ?, ?, ?)")
            .bind(timestamp)
            .bind(user)
            .bind(action)
            .bind(details)
            .execute(executor)
            .await?;
        tracing::debug!(user, action, details, "audit");
        Ok(())
    }

    pub async fn log(&self, user: &str, action: &str, details: &str) -> Result<(), DatabaseError> {
        Self::record(&self.pool, user, action, details).await
    }

    /// Newest entries first
    pub async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, AuditEntry>(
            "SELECT id, timestamp, user, action, details FROM audit ORDER BY id DESC LIMIT ?",
        )
        .bind(limit.clamp(1, 1000) as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
