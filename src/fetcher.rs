use chrono::FixedOffset;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{Config, Location};
use crate::error::{AppError, Result};
use crate::types::{ConditionCode, LocationMeta, ProviderForecast, RawSample};

const REDACTED_KEY: &str = "API_KEY_HIDDEN";

// ---------------------------------------------------------------------------
// Provider response shape (OpenWeatherMap 5 day / 3 hour forecast)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: City,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<WeatherBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherBlock {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct City {
    name: String,
    sunrise: i64,
    sunset: i64,
    /// Seconds east of UTC.
    #[serde(default)]
    timezone: i32,
}

/// HTTP client with the configured request timeout.
pub fn build_client(cfg: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(cfg.fetch_timeout).build()?)
}

/// Query parameters for the forecast request, API key included.
pub fn forecast_query(cfg: &Config) -> Vec<(&'static str, String)> {
    let mut query = match &cfg.location {
        Location::Coordinates { lat, lon } => {
            vec![("lat", lat.clone()), ("lon", lon.clone())]
        }
        Location::PostalCode { zip, country } => vec![("zip", format!("{zip},{country}"))],
    };
    query.push(("appid", cfg.api_key.clone()));
    query.push(("units", cfg.units.as_query().to_string()));
    query
}

/// Replace every occurrence of the API key so the text is safe to log.
pub fn redact(text: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        text.to_string()
    } else {
        text.replace(api_key, REDACTED_KEY)
    }
}

/// Fetch the forecast with a single GET and decode it at the boundary.
pub async fn fetch_forecast(client: &reqwest::Client, cfg: &Config) -> Result<ProviderForecast> {
    let url = format!("{}/data/2.5/forecast", cfg.api_url);
    let request = client
        .get(&url)
        .query(&forecast_query(cfg))
        .build()
        .map_err(transport_error)?;
    info!("Using API URL: {}", redact(request.url().as_str(), &cfg.api_key));

    let resp = client.execute(request).await.map_err(transport_error)?;
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let body = redact(&body, &cfg.api_key);
        warn!(status = status.as_u16(), "Forecast provider error: {body}");
        return Err(AppError::Provider { status: status.as_u16(), body });
    }

    let parsed: ForecastResponse = serde_json::from_str(&body)?;
    let forecast = decode(parsed)?;
    debug!(
        city = %forecast.location.city_name,
        samples = forecast.samples.len(),
        "Forecast fetched"
    );
    Ok(forecast)
}

/// reqwest errors carry the request URL, which includes the API key.
fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Http(e.without_url())
    }
}

fn decode(resp: ForecastResponse) -> Result<ProviderForecast> {
    let utc_offset = FixedOffset::east_opt(resp.city.timezone).ok_or_else(|| {
        AppError::Data(format!("invalid timezone offset {}", resp.city.timezone))
    })?;

    let samples = resp
        .list
        .into_iter()
        .map(|entry| {
            let weather = entry.weather.into_iter().next().ok_or_else(|| {
                AppError::Data(format!("forecast entry {} has no weather block", entry.dt))
            })?;
            Ok(RawSample {
                timestamp: entry.dt,
                temperature: entry.main.temp,
                condition: ConditionCode::parse(&weather.icon),
                main_condition: weather.main,
                description: weather.description,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProviderForecast {
        location: LocationMeta {
            city_name: resp.city.name,
            sunrise: resp.city.sunrise,
            sunset: resp.city.sunset,
            utc_offset,
        },
        samples,
    })
}
