use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Condition codes
// ---------------------------------------------------------------------------

/// Provider sky-condition code, split into its group and day/night flag.
/// `"10d"` decodes to group `"10"`, daytime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionCode {
    pub group: String,
    pub is_daytime: bool,
}

impl ConditionCode {
    pub fn new(group: impl Into<String>, is_daytime: bool) -> Self {
        Self { group: group.into(), is_daytime }
    }

    /// Decode a provider icon token. A token without a trailing `d`/`n` marker is
    /// kept whole and treated as a night code, so it never outranks a daytime one.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Some(group) = token.strip_suffix('d') {
            Self::new(group, true)
        } else if let Some(group) = token.strip_suffix('n') {
            Self::new(group, false)
        } else {
            Self::new(token, false)
        }
    }

    /// Display glyph for the page.
    pub fn icon(&self) -> &'static str {
        match (self.group.as_str(), self.is_daytime) {
            ("01", true) => "☀️",
            ("01", false) => "🌙",
            ("02", true) => "🌤️",
            ("02", false) => "🌙☁️",
            ("03", true) => "⛅",
            ("03", false) => "☁️",
            ("04", _) => "☁️",
            ("09", _) => "🌧️",
            ("10", true) => "🌦️",
            ("10", false) => "🌧️",
            ("11", _) => "⛈️",
            ("13", _) => "❄️",
            ("50", _) => "🌫️",
            _ => "🌡️",
        }
    }
}

impl std::fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.is_daytime { 'd' } else { 'n' };
        write!(f, "{}{marker}", self.group)
    }
}

// ---------------------------------------------------------------------------
// Provider data
// ---------------------------------------------------------------------------

/// One provider time-series point.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Unix seconds.
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: ConditionCode,
    /// Coarse category, e.g. "Rain", "Snow", "Clear".
    pub main_condition: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationMeta {
    pub city_name: String,
    /// Unix seconds.
    pub sunrise: i64,
    /// Unix seconds.
    pub sunset: i64,
    /// Provider local time, as an offset from UTC.
    pub utc_offset: FixedOffset,
}

/// Everything one fetch returns, decoded at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderForecast {
    pub location: LocationMeta,
    pub samples: Vec<RawSample>,
}

// ---------------------------------------------------------------------------
// Clothing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClothingBand {
    VeryHot,
    Hot,
    Warm,
    Cool,
    Cold,
    VeryCold,
}

impl std::fmt::Display for ClothingBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClothingBand::VeryHot => "very_hot",
            ClothingBand::Hot => "hot",
            ClothingBand::Warm => "warm",
            ClothingBand::Cool => "cool",
            ClothingBand::Cold => "cold",
            ClothingBand::VeryCold => "very_cold",
        };
        write!(f, "{s}")
    }
}

/// Five-slot outfit. `None` slots are left off the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingRecommendation {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub footwear: Option<String>,
    pub outerwear: Option<String>,
    pub accessories: Option<String>,
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLabel {
    /// "Sunday"
    pub day_name: String,
    pub day: u32,
    /// "Jan"
    pub month: String,
    /// "Sunday, 5 Jan"
    pub display: String,
}

impl DateLabel {
    pub fn from_date(date: NaiveDate) -> Self {
        let day_name = date.format("%A").to_string();
        let month = date.format("%b").to_string();
        let day = date.day();
        Self {
            display: format!("{day_name}, {day} {month}"),
            day_name,
            day,
            month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Days from today; 0 = today.
    pub day_offset: u32,
    pub date: DateLabel,
    pub high_temp: i32,
    pub low_temp: i32,
    /// `(high_temp + low_temp) / 2`, not the mean of the samples.
    pub avg_temp: f64,
    pub dominant_condition: ConditionCode,
    /// Taken from the first sample of the day, not from the dominant condition.
    pub main_condition: String,
    pub description: String,
    pub band: ClothingBand,
    pub clothing: ClothingRecommendation,
    pub needs_rain_gear: bool,
    pub needs_snow_gear: bool,
}

/// Render input for one pipeline run. Persisted as `forecast.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub city_name: String,
    /// "6am"
    pub sunrise: String,
    /// "8pm"
    pub sunset: String,
    pub units: crate::config::UnitSystem,
    /// Index 0 is today. May hold fewer days than the horizon.
    pub days: Vec<DaySummary>,
    pub generated_at: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_code_decodes_day_night_marker() {
        assert_eq!(ConditionCode::parse("10d"), ConditionCode::new("10", true));
        assert_eq!(ConditionCode::parse("01n"), ConditionCode::new("01", false));
        assert_eq!(ConditionCode::parse("01n").to_string(), "01n");
    }

    #[test]
    fn unmarked_code_is_not_daytime() {
        let c = ConditionCode::parse("xx");
        assert_eq!(c.group, "xx");
        assert!(!c.is_daytime);
        assert_eq!(c.icon(), "🌡️");
    }

    #[test]
    fn icons_follow_day_flag() {
        assert_eq!(ConditionCode::parse("01d").icon(), "☀️");
        assert_eq!(ConditionCode::parse("01n").icon(), "🌙");
        assert_eq!(ConditionCode::parse("13n").icon(), "❄️");
    }

    #[test]
    fn date_label_display() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let label = DateLabel::from_date(d);
        assert_eq!(label.day_name, "Sunday");
        assert_eq!(label.day, 5);
        assert_eq!(label.month, "Jan");
        assert_eq!(label.display, "Sunday, 5 Jan");
    }
}
