//! Forecast pipeline: raw provider samples → per-day buckets → summaries → snapshot.

pub mod aggregator;
pub mod classifier;
pub mod summarizer;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use tracing::debug;

use crate::config::{ThresholdUnit, UnitSystem};
use crate::error::{AppError, Result};
use crate::types::{ForecastSnapshot, ProviderForecast};

pub use aggregator::{group_by_day, DayBucket};
pub use classifier::{classify, classify_in};
pub use summarizer::{dominant_condition, summarize_day};

/// Build the render snapshot for one run. `now` pins "today" for the provider's local time.
/// A forecast with no samples inside the horizon is a data error.
pub fn build_snapshot(
    forecast: ProviderForecast,
    units: UnitSystem,
    thresholds: ThresholdUnit,
    horizon: u32,
    now: DateTime<Utc>,
) -> Result<ForecastSnapshot> {
    let offset = forecast.location.utc_offset;
    let local_now = now.with_timezone(&offset);
    let sample_count = forecast.samples.len();

    let buckets = group_by_day(forecast.samples, local_now.date_naive(), offset, horizon);
    debug!(
        samples = sample_count,
        days = buckets.len(),
        horizon,
        "Grouped forecast samples by day"
    );
    if buckets.is_empty() {
        return Err(AppError::Data(format!(
            "no forecast samples within {horizon} day(s) of {}",
            local_now.date_naive()
        )));
    }

    let days = buckets
        .iter()
        .map(|b| summarize_day(b, units, thresholds))
        .collect::<Result<Vec<_>>>()?;
    for day in &days {
        debug!(
            day = day.day_offset,
            code = %day.dominant_condition,
            band = %day.band,
            "Summarized {}",
            day.date.display
        );
    }

    Ok(ForecastSnapshot {
        city_name: forecast.location.city_name,
        sunrise: format_clock(forecast.location.sunrise, offset),
        sunset: format_clock(forecast.location.sunset, offset),
        units,
        days,
        generated_at: local_now,
    })
}

/// Hour-only clock label in local time: `0` → "12am", `13:45` → "1pm".
pub fn format_clock(timestamp: i64, offset: FixedOffset) -> String {
    let Some(t) = DateTime::from_timestamp(timestamp, 0) else {
        return "--".to_string();
    };
    let (pm, hour) = t.with_timezone(&offset).hour12();
    format!("{hour}{}", if pm { "pm" } else { "am" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClothingBand, ConditionCode, LocationMeta, RawSample};
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn local(day: u32, hour: u32) -> i64 {
        offset()
            .with_ymd_and_hms(2025, 3, day, hour, 0, 0)
            .unwrap()
            .timestamp()
    }

    fn sample(ts: i64, temp: f64, code: &str, main: &str) -> RawSample {
        RawSample {
            timestamp: ts,
            temperature: temp,
            condition: ConditionCode::parse(code),
            main_condition: main.into(),
            description: main.to_lowercase(),
        }
    }

    fn forecast(samples: Vec<RawSample>) -> ProviderForecast {
        ProviderForecast {
            location: LocationMeta {
                city_name: "Springfield".into(),
                sunrise: local(4, 6) + 1800,
                sunset: local(4, 18) + 600,
                utc_offset: offset(),
            },
            samples,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(local(4, 8), 0).unwrap()
    }

    fn build(f: ProviderForecast) -> Result<ForecastSnapshot> {
        build_snapshot(f, UnitSystem::Imperial, ThresholdUnit::Configured, 2, now())
    }

    #[test]
    fn builds_two_day_snapshot() {
        let f = forecast(vec![
            sample(local(4, 9), 60.0, "01d", "Clear"),
            sample(local(4, 15), 80.0, "01d", "Clear"),
            sample(local(5, 12), 45.0, "10d", "Rain"),
            sample(local(6, 12), 90.0, "01d", "Clear"),
        ]);
        let snap = build(f).unwrap();
        assert_eq!(snap.city_name, "Springfield");
        assert_eq!(snap.sunrise, "6am");
        assert_eq!(snap.sunset, "6pm");
        assert_eq!(snap.days.len(), 2);
        assert_eq!(snap.days[0].band, ClothingBand::Warm);
        assert_eq!(snap.days[1].high_temp, 45);
        assert!(snap.days[1].needs_rain_gear);
        assert_eq!(snap.generated_at.offset(), &offset());
    }

    #[test]
    fn nothing_in_horizon_is_data_error() {
        let f = forecast(vec![sample(local(8, 12), 70.0, "01d", "Clear")]);
        let err = build(f).unwrap_err();
        assert!(matches!(err, AppError::Data(_)));
    }

    #[test]
    fn only_tomorrow_available() {
        let f = forecast(vec![sample(local(5, 12), 70.0, "01d", "Clear")]);
        let snap = build(f).unwrap();
        assert_eq!(snap.days.len(), 1);
        assert_eq!(snap.days[0].day_offset, 1);
        assert_eq!(snap.days[0].date.day, 5);
    }

    #[test]
    fn snapshot_json_round_trip() {
        let f = forecast(vec![
            sample(local(4, 9), 61.3, "02d", "Clouds"),
            sample(local(4, 21), 49.6, "02n", "Clouds"),
            sample(local(5, 9), 33.0, "13d", "Snow"),
        ]);
        let snap = build(f).unwrap();
        let json = serde_json::to_string_pretty(&snap).unwrap();
        let back: ForecastSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn clock_labels() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_clock(0, utc), "12am");
        assert_eq!(format_clock(12 * 3600, utc), "12pm");
        assert_eq!(format_clock(13 * 3600 + 45 * 60, utc), "1pm");
        assert_eq!(format_clock(i64::MAX, utc), "--");
    }
}
