use anyhow::Result;
use construction_estimator::api::{router, AppState};
use construction_estimator::config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Starting construction estimator API server");

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.policy);

    let prices = config.price_book()?;
    info!("Price tables ready for {} cities", prices.cities().len());

    let state = AppState {
        prices: Arc::new(prices),
        policy: config.policy,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
