use std::sync::Arc;

use anyhow::Result;
use edutube::application::usecases::catalog_sync::CatalogSyncUseCase;
use edutube::config::config_loader;
use edutube::infrastructure::postgres::postgres_connection;
use edutube::infrastructure::postgres::repositories::{
    categories::CategoryPostgres, videos::VideoPostgres,
};
use edutube::infrastructure::youtube::youtube_client::YoutubeClient;
use tracing::{error, info};

/// One-shot import of a YouTube channel's uploads into the catalog.
///
/// Usage: import_channel <channel_id>
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(error) = run().await {
        error!("Channel import exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let channel_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: import_channel <channel_id>"))?;

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool = Arc::new(postgres_pool);
    let provider = YoutubeClient::new(dotenvy_env.youtube.api_key.clone());
    let video_repository = VideoPostgres::new(Arc::clone(&db_pool));
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let catalog_sync_usecase = CatalogSyncUseCase::new(
        Arc::new(provider),
        Arc::new(video_repository),
        Arc::new(category_repository),
    );

    let processed = catalog_sync_usecase.sync_channel(&channel_id).await?;
    info!(channel_id, processed, "Channel import finished");

    Ok(())
}
