//! Wealth data service binary
//!
//! Serves cached net worth figures and the monthly refresh trigger.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealthpile_api::{ApiConfig, WealthServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wealthpile_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wealth data service");

    let config = ApiConfig::from_env()?;
    let server = WealthServer::new(config)?;
    server.run().await?;

    Ok(())
}
