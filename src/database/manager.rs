use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::auth::hash_password;
use crate::config::DatabaseConfig;
use crate::workflow::Role;

/// Errors from DatabaseManager and the repositories built on its pool
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the underlying SQLite error is a primary key / unique violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password TEXT NOT NULL,
        role TEXT NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        dept TEXT NOT NULL DEFAULT '',
        hod_email TEXT NOT NULL DEFAULT '',
        force_reset INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS requests (
        id TEXT PRIMARY KEY,
        user_key TEXT NOT NULL,
        requester_name TEXT NOT NULL,
        department TEXT NOT NULL,
        approver_email TEXT NOT NULL,
        category TEXT NOT NULL,
        item TEXT NOT NULL,
        status TEXT NOT NULL,
        amount REAL NOT NULL DEFAULT 0,
        initial_cost REAL NOT NULL DEFAULT 0,
        vendor TEXT NOT NULL DEFAULT '',
        invoice_img BLOB,
        sac_note TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_requests_status ON requests (status)",
    "CREATE INDEX IF NOT EXISTS idx_requests_user_key ON requests (user_key)",
    r#"CREATE TABLE IF NOT EXISTS audit (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        user TEXT NOT NULL,
        action TEXT NOT NULL,
        details TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS payments (
        payment_id TEXT PRIMARY KEY,
        req_id TEXT NOT NULL REFERENCES requests (id),
        amount REAL NOT NULL,
        status TEXT NOT NULL,
        vendor TEXT NOT NULL
    )"#,
];

/// Username of the seeded administrator account
pub const SUPERUSER: &str = "super";

/// Opens the SQLite pool and owns schema setup
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool for the configured database, creating the file if needed,
    /// then make sure the schema and default superuser exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!("Created database pool for: {}", config.url);

        Self::initialize(&pool, &config.superuser_password).await?;
        Ok(pool)
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same memory store.
    pub async fn connect_in_memory(superuser_password: &str) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::initialize(&pool, superuser_password).await?;
        Ok(pool)
    }

    pub async fn initialize(pool: &SqlitePool, superuser_password: &str) -> Result<(), DatabaseError> {
        Self::migrate(pool).await?;
        Self::seed_superuser(pool, superuser_password).await
    }

    /// Create tables and indexes that are missing
    pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }

    async fn seed_superuser(pool: &SqlitePool, password: &str) -> Result<(), DatabaseError> {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO users (username, password, role, name, email, dept, hod_email, force_reset)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(SUPERUSER)
        .bind(hash_password(password))
        .bind(Role::Superuser.as_str())
        .bind("IT Admin")
        .bind("it@co.com")
        .bind("IT")
        .bind("")
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            info!("Seeded default superuser '{}'", SUPERUSER);
        }
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
