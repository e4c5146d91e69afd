use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const OWM_API_URL: &str = "https://api.openweathermap.org";

/// Page regeneration interval (seconds).
pub const REFRESH_INTERVAL_SECS: u64 = 3600;

/// Outbound forecast request timeout (seconds). Expiry counts as a fetch failure.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Number of calendar days rendered, today inclusive.
pub const DEFAULT_FORECAST_DAYS: u32 = 2;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COUNTRY_CODE: &str = "us";
pub const DEFAULT_OUTPUT_DIR: &str = "public";

/// Clothing band lower bounds, compared against the average in the configured unit
/// unless `ThresholdUnit::Fahrenheit` is set. A temperature equal to a bound belongs to that band.
pub mod clothing_thresholds {
    pub const VERY_HOT_MIN: f64 = 85.0;
    pub const HOT_MIN: f64 = 75.0;
    pub const WARM_MIN: f64 = 65.0;
    pub const COOL_MIN: f64 = 55.0;
    pub const COLD_MIN: f64 = 40.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "imperial" => Some(UnitSystem::Imperial),
            "metric" => Some(UnitSystem::Metric),
            _ => None,
        }
    }

    /// Value sent as the provider's `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "°F",
            UnitSystem::Metric => "°C",
        }
    }

    pub fn to_fahrenheit(&self, temp: f64) -> f64 {
        match self {
            UnitSystem::Imperial => temp,
            UnitSystem::Metric => temp * 9.0 / 5.0 + 32.0,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

/// Scale the clothing thresholds are read in (CLOTHING_THRESHOLDS_UNIT).
/// `Configured` compares the average as fetched; `Fahrenheit` converts it to °F first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdUnit {
    #[default]
    Configured,
    Fahrenheit,
}

impl ThresholdUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "configured" => Some(ThresholdUnit::Configured),
            "fahrenheit" => Some(ThresholdUnit::Fahrenheit),
            _ => None,
        }
    }

    /// The value compared against the thresholds for an average in `units`.
    pub fn scale(&self, avg_temp: f64, units: UnitSystem) -> f64 {
        match self {
            ThresholdUnit::Configured => avg_temp,
            ThresholdUnit::Fahrenheit => units.to_fahrenheit(avg_temp),
        }
    }
}

/// Where to ask the provider for a forecast. Coordinates win when both are configured.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { lat: String, lon: String },
    PostalCode { zip: String, country: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub location: Location,
    pub units: UnitSystem,
    pub threshold_unit: ThresholdUnit,
    pub port: u16,
    pub log_level: String,
    pub api_url: String,
    /// Directory holding `index.html`, `forecast.json` and static assets (OUTPUT_DIR)
    pub output_dir: PathBuf,
    /// Seconds between background regenerations (REFRESH_INTERVAL_SECS)
    pub refresh_interval: Duration,
    /// Outbound request timeout (FETCH_TIMEOUT_SECS)
    pub fetch_timeout: Duration,
    /// Forecast horizon in days, today inclusive (FORECAST_DAYS)
    pub forecast_days: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("WEATHER_API_KEY");
        let coords = get("LAT").zip(get("LON"));
        let zip = get("ZIP_CODE");

        let (api_key, location) = match (api_key, coords, zip) {
            (Some(key), Some((lat, lon)), _) => (key, Location::Coordinates { lat, lon }),
            (Some(key), None, Some(zip)) => (
                key,
                Location::PostalCode {
                    zip,
                    country: get("COUNTRY_CODE")
                        .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
                },
            ),
            _ => {
                return Err(AppError::Config(
                    "set WEATHER_API_KEY and either LAT/LON or ZIP_CODE".to_string(),
                ))
            }
        };

        let units = match get("UNIT_SYSTEM") {
            Some(s) => UnitSystem::parse(&s).ok_or_else(|| {
                AppError::Config(format!("UNIT_SYSTEM must be imperial or metric, got {s:?}"))
            })?,
            None => UnitSystem::default(),
        };

        let threshold_unit = match get("CLOTHING_THRESHOLDS_UNIT") {
            Some(s) => ThresholdUnit::parse(&s).ok_or_else(|| {
                AppError::Config(format!(
                    "CLOTHING_THRESHOLDS_UNIT must be configured or fahrenheit, got {s:?}"
                ))
            })?,
            None => ThresholdUnit::default(),
        };

        let port = parse_or(get("PORT"), DEFAULT_PORT, "PORT must be a valid port number")?;
        let refresh_secs = parse_or(
            get("REFRESH_INTERVAL_SECS"),
            REFRESH_INTERVAL_SECS,
            "REFRESH_INTERVAL_SECS must be a positive integer",
        )?;
        let timeout_secs = parse_or(
            get("FETCH_TIMEOUT_SECS"),
            FETCH_TIMEOUT_SECS,
            "FETCH_TIMEOUT_SECS must be a positive integer",
        )?;
        let forecast_days = parse_or(
            get("FORECAST_DAYS"),
            DEFAULT_FORECAST_DAYS,
            "FORECAST_DAYS must be a positive integer",
        )?;

        if refresh_secs == 0 || timeout_secs == 0 || forecast_days == 0 {
            return Err(AppError::Config(
                "REFRESH_INTERVAL_SECS, FETCH_TIMEOUT_SECS and FORECAST_DAYS must be > 0"
                    .to_string(),
            ));
        }

        Ok(Self {
            api_key,
            location,
            units,
            threshold_unit,
            port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            api_url: get("OWM_API_URL")
                .unwrap_or_else(|| OWM_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            output_dir: PathBuf::from(
                get("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            refresh_interval: Duration::from_secs(refresh_secs),
            fetch_timeout: Duration::from_secs(timeout_secs),
            forecast_days,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T, msg: &str) -> Result<T> {
    match raw {
        Some(s) => s.parse::<T>().map_err(|_| AppError::Config(msg.to_string())),
        None => Ok(default),
    }
}
