//! Prepares the tagging schema in the configured SQLite database.

use tagging::db::{self, SqliteTagRepository};
use tagging::{telemetry, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    telemetry::init_tracing(&config)?;

    tracing::info!("Preparing tagging schema");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!(
        "Maximum tags per entity: {}",
        config.options.max_tags_per_entity
    );

    let pool = db::init_database(&config.db_path).await?;
    let repo = SqliteTagRepository::new(pool.clone());

    let count = repo.count().await?;
    tracing::info!("Schema ready, {} tags stored", count);

    pool.close().await;

    Ok(())
}
