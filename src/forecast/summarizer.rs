use crate::config::{ThresholdUnit, UnitSystem};
use crate::error::{AppError, Result};
use crate::forecast::aggregator::DayBucket;
use crate::forecast::classifier::classify_in;
use crate::types::{ConditionCode, DateLabel, DaySummary};

/// Reduce one day's samples to a displayable summary.
///
/// High and low are rounded half away from zero (`f64::round`), so -2.5 shows as -3.
/// The average is the midpoint of the rounded high and low.
/// Headline condition text comes from the day's first sample even when the
/// dominant icon differs.
pub fn summarize_day(
    bucket: &DayBucket,
    units: UnitSystem,
    thresholds: ThresholdUnit,
) -> Result<DaySummary> {
    let first = bucket.samples.first().ok_or_else(|| {
        AppError::Data(format!("insufficient data for {}", bucket.date))
    })?;

    let temps = bucket.temperatures();
    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    if !max.is_finite() || !min.is_finite() {
        return Err(AppError::Data(format!(
            "non-finite temperatures for {}",
            bucket.date
        )));
    }
    let high_temp = max.round() as i32;
    let low_temp = min.round() as i32;
    let avg_temp = f64::from(high_temp + low_temp) / 2.0;

    let dominant_condition = dominant_condition(&bucket.condition_codes())
        .ok_or_else(|| AppError::Data(format!("insufficient data for {}", bucket.date)))?;

    let main = first.main_condition.to_lowercase();
    let band = classify_in(avg_temp, units, thresholds);

    Ok(DaySummary {
        day_offset: bucket.day_offset,
        date: DateLabel::from_date(bucket.date),
        high_temp,
        low_temp,
        avg_temp,
        dominant_condition,
        main_condition: first.main_condition.clone(),
        description: first.description.clone(),
        band,
        clothing: band.recommendation(),
        needs_rain_gear: main.contains("rain") || main.contains("drizzle"),
        needs_snow_gear: main.contains("snow"),
    })
}

/// Most frequent code, preferring daytime codes. Falls back to all codes only
/// when no daytime code is present. Ties go to the code seen first.
pub fn dominant_condition(codes: &[&ConditionCode]) -> Option<ConditionCode> {
    let mut tally: Vec<(&ConditionCode, usize)> = Vec::new();
    for &code in codes {
        match tally.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => tally.push((code, 1)),
        }
    }

    let most_frequent = |daytime_only: bool| {
        let mut best: Option<(&ConditionCode, usize)> = None;
        for &(code, n) in &tally {
            if daytime_only && !code.is_daytime {
                continue;
            }
            if best.map_or(true, |(_, top)| n > top) {
                best = Some((code, n));
            }
        }
        best.map(|(code, _)| code.clone())
    };

    most_frequent(true).or_else(|| most_frequent(false))
}
