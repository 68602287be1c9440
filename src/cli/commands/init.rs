use serde_json::json;

use crate::cli::utils::{open_pool, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::manager::SUPERUSER;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_pool().await?;
    pool.close().await;

    output_success(
        &output_format,
        &format!("Database ready at {}", config().database.url),
        Some(json!({ "database_url": config().database.url, "superuser": SUPERUSER })),
    )
}
