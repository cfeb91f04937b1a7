//! Wealthpile Scene Server
//!
//! Animate the billionaire and household piles and stream them to viewers.

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealthpile_growth::{WealthProfile, AVERAGE_HOUSEHOLD_ID, BILLIONAIRE_ID};
use wealthpile_scene::{
    driver, spawn_refresh, DriverHandle, FrameDriver, SceneConfig, SceneServer, Session,
    WealthSource,
};

fn start_driver(
    profile: WealthProfile,
    config: &SceneConfig,
) -> wealthpile_scene::Result<(DriverHandle, watch::Receiver<Option<wealthpile_scene::SceneFrame>>)> {
    let session = Session::new(profile, config.pile_capacity, driver::now())?;
    let (tx, rx) = watch::channel(None);
    let handle = FrameDriver::new(session, tx, config.frame_interval()).spawn();
    Ok((handle, rx))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wealthpile_scene=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SceneConfig::from_env()?;
    tracing::info!("Wealthpile scene");
    tracing::info!("  Frame rate: {} fps", config.fps);
    tracing::info!("  Refresh every: {:?}", config.refresh_interval);
    tracing::info!(
        "  Wealth service: {}",
        config.api_url.as_deref().unwrap_or("not configured, using estimates")
    );

    // Animate the built-in estimates straight away; live figures swap in when they arrive.
    let (billionaire, billionaire_rx) = start_driver(WealthProfile::billionaire_fallback(), &config)?;
    let (household, household_rx) = start_driver(WealthProfile::average_household(), &config)?;

    let source = WealthSource::from_config(&config)?;
    let refreshes = [
        spawn_refresh(
            source.clone(),
            BILLIONAIRE_ID.to_string(),
            billionaire.swapper(),
            Some(config.refresh_interval),
        ),
        spawn_refresh(source, AVERAGE_HOUSEHOLD_ID.to_string(), household.swapper(), None),
    ];

    let listener = TcpListener::bind(config.scene_addr).await?;
    let server = SceneServer::new(billionaire_rx, household_rx);
    server
        .serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    billionaire.shutdown().await;
    household.shutdown().await;
    for refresh in refreshes {
        refresh.abort();
    }

    Ok(())
}
