use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::api::health::HealthState;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{build_client, fetch_forecast};
use crate::forecast::build_snapshot;
use crate::output::OutputStore;
use crate::render::{render_forecast, render_unavailable};
use crate::types::ForecastSnapshot;

/// Fetch and summarize one forecast. `now` decides which local day is "today".
pub async fn generate(
    client: &reqwest::Client,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<ForecastSnapshot> {
    let forecast = fetch_forecast(client, cfg).await?;
    build_snapshot(forecast, cfg.units, cfg.threshold_unit, cfg.forecast_days, now)
}

/// Runs the fetch → render → persist pipeline, on a timer and on demand.
/// Runs are serialized so a manual update never interleaves its writes with a
/// scheduled one.
pub struct Refresher {
    cfg: Config,
    client: reqwest::Client,
    store: OutputStore,
    health: Arc<HealthState>,
    run_lock: Mutex<()>,
}

impl Refresher {
    pub fn new(cfg: Config, store: OutputStore, health: Arc<HealthState>) -> Result<Self> {
        let client = build_client(&cfg)?;
        Ok(Self { cfg, client, store, health, run_lock: Mutex::new(()) })
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Refresh immediately, then every configured interval. Failures are logged
    /// and retried on the next tick.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.cfg.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first = true;

        loop {
            ticker.tick().await;
            match self.refresh().await {
                Ok(snapshot) if first => info!(
                    city = %snapshot.city_name,
                    "Initial weather data generated"
                ),
                Ok(_) => info!("Weather data updated"),
                Err(e) => error!("Weather refresh failed: {e}"),
            }
            first = false;
        }
    }

    /// One full pipeline run. On a fetch or data failure the "no data" page is
    /// written only when no page exists yet, so the last good page stays served.
    pub async fn refresh(&self) -> Result<ForecastSnapshot> {
        let _guard = self.run_lock.lock().await;
        self.health.record_attempt();

        let result = self.run_pipeline().await;
        match &result {
            Ok(snapshot) => {
                self.health.record_success(snapshot.generated_at.timestamp());
                info!(
                    city = %snapshot.city_name,
                    days = snapshot.days.len(),
                    "Forecast page generated"
                );
            }
            Err(e) => {
                self.health.record_failure();
                if e.is_no_data() {
                    if let Err(fallback_err) = self.write_fallback().await {
                        error!("Failed to write fallback page: {fallback_err}");
                    }
                }
            }
        }
        result
    }

    async fn run_pipeline(&self) -> Result<ForecastSnapshot> {
        let snapshot = generate(&self.client, &self.cfg, Utc::now()).await?;
        let html = render_forecast(&snapshot)?;
        self.store.write_page(&html).await?;
        self.store.write_snapshot(&snapshot).await?;
        Ok(snapshot)
    }

    async fn write_fallback(&self) -> Result<()> {
        let html = render_unavailable()?;
        if self.store.has_page().await? {
            warn!("No forecast data; keeping previously generated page");
            return Ok(());
        }
        self.store.write_page(&html).await?;
        warn!("No forecast data; wrote fallback page");
        Ok(())
    }
}
