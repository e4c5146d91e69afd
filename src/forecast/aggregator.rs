use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::types::{ConditionCode, RawSample};

/// Samples that fall on one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// 0 = today.
    pub day_offset: u32,
    pub date: NaiveDate,
    /// Arrival order is preserved.
    pub samples: Vec<RawSample>,
}

impl DayBucket {
    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temperature).collect()
    }

    pub fn condition_codes(&self) -> Vec<&ConditionCode> {
        self.samples.iter().map(|s| &s.condition).collect()
    }
}

/// Local calendar date of a Unix timestamp. None if out of chrono's range.
pub fn local_date(timestamp: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|t| t.with_timezone(&offset).date_naive())
}

/// Partition samples into per-day buckets for offsets `0..horizon`, ordered by offset.
/// Past days, days beyond the horizon and unrepresentable timestamps are dropped.
/// Days without samples get no bucket.
pub fn group_by_day(
    samples: Vec<RawSample>,
    today: NaiveDate,
    offset: FixedOffset,
    horizon: u32,
) -> Vec<DayBucket> {
    let mut days: BTreeMap<u32, DayBucket> = BTreeMap::new();

    for sample in samples {
        let Some(date) = local_date(sample.timestamp, offset) else {
            continue;
        };
        let diff = (date - today).num_days();
        if diff < 0 || diff >= i64::from(horizon) {
            continue;
        }
        let day_offset = diff as u32;
        days.entry(day_offset)
            .or_insert_with(|| DayBucket { day_offset, date, samples: Vec::new() })
            .samples
            .push(sample);
    }

    days.into_values().collect()
}
