use crate::cli::utils::{open_pool, output_collection};
use crate::cli::OutputFormat;
use crate::services::AuditService;

pub async fn handle(limit: u32, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_pool().await?;
    let entries = AuditService::new(pool.clone()).recent(limit).await?;
    pool.close().await;

    output_collection(&output_format, "audit", &entries, "Audit log is empty", |e| {
        format!("{}  {:<16} {:<10} {}", e.timestamp, e.user, e.action, e.details)
    })
}
