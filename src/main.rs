use facility_portal::{app, config, is_production};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    tracing::info!("Starting Facility 365 Portal in {:?} mode", config.environment);

    if is_production!() && config.database.superuser_password == "123" {
        tracing::warn!("Default superuser password in use; set FACILITY_SUPERUSER_PASSWORD");
    }

    app::serve(config).await
}
