use serde::Serialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

/// Open the configured database, creating the schema if it is missing
pub async fn open_pool() -> anyhow::Result<SqlitePool> {
    Ok(DatabaseManager::connect(&config().database).await?)
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a collection, rendering each row with `line` in text mode
pub fn output_collection<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_message);
            }
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}
