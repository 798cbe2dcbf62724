use anyhow::Result;
use log::{error, info, warn};
use sentineld::api::rest::{AppState, RestApi};
use sentineld::config;
use sentineld::db::DatabaseService;
use sentineld::security::SecurityService;
use sentineld::services::export::{HttpImageFetcher, ImageFetcher};
use sentineld::services::movements::MovementFeed;
use std::path::PathBuf;
use std::sync::Arc;

async fn run_app() -> Result<()> {
    env_logger::init();
    info!("Starting SmartSchool Sentinel backend");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    let database = DatabaseService::new(&config.database).await?;
    let db_pool = Arc::clone(&database.pool);

    let security = Arc::new(SecurityService::new(config.security.clone()));
    let image_fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new(&config.export)?);
    let movements = Arc::new(MovementFeed::new(Arc::clone(&db_pool), 200));

    // Invalidation listener for the movements feed; a dropped connection
    // leaves the feed dirty so reads fall back to refetching.
    let listener_feed = Arc::clone(&movements);
    let listener_pool = Arc::clone(&db_pool);
    tokio::spawn(async move {
        if let Err(e) = listener_feed.run_listener(listener_pool).await {
            warn!("Movement feed listener stopped: {}", e);
        }
    });

    let state = AppState {
        db_pool,
        security,
        movements,
        image_fetcher,
    };

    let http_server = RestApi::new(&config.api, state);

    tokio::select! {
        result = http_server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
