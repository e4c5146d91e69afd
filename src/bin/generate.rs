//! One-shot page generator: runs the pipeline once, writes the outputs and exits.
//! Exits non-zero when no forecast could be produced.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use littleweather::api::HealthState;
use littleweather::config::Config;
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

    let store = OutputStore::new(cfg.output_dir.clone());
    if let Err(e) = store.prepare().await {
        error!("Cannot prepare {}: {e}", cfg.output_dir.display());
        std::process::exit(1);
    }

    let refresher = match Refresher::new(cfg, store, Arc::new(HealthState::new())) {
        Ok(r) => r,
        Err(e) => {
            error!("Fatal error: {e}");
            std::process::exit(1);
        }
    };

    match refresher.refresh().await {
        Ok(snapshot) => info!(
            city = %snapshot.city_name,
            days = snapshot.days.len(),
            "Wrote {}",
            refresher.store().page_path().display(),
        ),
        Err(e) => {
            error!("Failed to generate forecast page: {e}");
            std::process::exit(1);
        }
    }
}
