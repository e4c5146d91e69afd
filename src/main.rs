use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use littleweather::api::{router, ApiState, HealthState};
use littleweather::config::{Config, Location};
use littleweather::error::Result;
use littleweather::output::OutputStore;
use littleweather::refresh::Refresher;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    match &cfg.location {
        Location::Coordinates { lat, lon } => info!("Forecast location: lat={lat} lon={lon}"),
        Location::PostalCode { zip, country } => info!("Forecast location: zip={zip},{country}"),
    }
    info!(
        units = %cfg.units,
        days = cfg.forecast_days,
        refresh_secs = cfg.refresh_interval.as_secs(),
        "Output directory: {}",
        cfg.output_dir.display(),
    );

    // --- Output directory + static assets ---
    let store = OutputStore::new(cfg.output_dir.clone());
    store.prepare().await?;
    match store.read_snapshot().await {
        Ok(Some(prev)) => info!(
            city = %prev.city_name,
            generated_at = %prev.generated_at,
            "Serving previous forecast until the first refresh completes"
        ),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable {}: {e}", store.snapshot_path().display()),
    }

    // --- Background refresh (runs once immediately, then on the interval) ---
    let health = Arc::new(HealthState::new());
    let refresher = Arc::new(Refresher::new(cfg.clone(), store, Arc::clone(&health))?);
    tokio::spawn(Arc::clone(&refresher).run());

    // --- HTTP server ---
    let app = router(ApiState { refresher, health });
    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://localhost:{}", cfg.port);

    axum::serve(listener, app).await?;

    Ok(())
}
