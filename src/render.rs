//! HTML page rendering. Two modes: the full forecast page, and the minimal
//! "no data" page used when a run produced no snapshot.

use askama::Template;

use crate::error::Result;
use crate::types::{ClothingRecommendation, DaySummary, ForecastSnapshot};

/// Days addressed by the page layout: today and tomorrow.
const MAX_RENDERED_DAYS: usize = 2;

const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Template)]
#[template(path = "forecast.html")]
struct ForecastPage<'a> {
    city_name: &'a str,
    sunrise: &'a str,
    sunset: &'a str,
    unit_symbol: &'static str,
    days: Vec<DayView<'a>>,
    alerts: Vec<Alert>,
    updated: String,
}

#[derive(Template)]
#[template(path = "unavailable.html")]
struct UnavailablePage<'a> {
    hint: &'a str,
}

struct DayView<'a> {
    offset: u32,
    day_name: &'a str,
    day: u32,
    month: &'a str,
    icon: &'static str,
    high: i32,
    low: i32,
    description: &'a str,
    clothing: Vec<ClothingItem<'a>>,
}

struct ClothingItem<'a> {
    icon: &'static str,
    text: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub icon: &'static str,
    pub message: &'static str,
}

pub const RAIN_ALERT: Alert = Alert {
    icon: "☔",
    message: "Don't forget your rain gear today!",
};

pub const SNOW_ALERT: Alert = Alert {
    icon: "❄️",
    message: "It's snowing! Wear warm, waterproof clothing.",
};

/// Render the page for a run. `None` means the run produced no data.
pub fn render_page(snapshot: Option<&ForecastSnapshot>) -> Result<String> {
    match snapshot {
        Some(s) => render_forecast(s),
        None => render_unavailable(),
    }
}

pub fn render_forecast(snapshot: &ForecastSnapshot) -> Result<String> {
    let page = ForecastPage {
        city_name: &snapshot.city_name,
        sunrise: &snapshot.sunrise,
        sunset: &snapshot.sunset,
        unit_symbol: snapshot.units.symbol(),
        days: snapshot
            .days
            .iter()
            .take(MAX_RENDERED_DAYS)
            .map(day_view)
            .collect(),
        alerts: alerts_for(&snapshot.days),
        updated: snapshot.generated_at.format(UPDATED_FORMAT).to_string(),
    };
    Ok(page.render()?)
}

pub fn render_unavailable() -> Result<String> {
    let page = UnavailablePage {
        hint: "Please check your configuration and try again.",
    };
    Ok(page.render()?)
}

/// Gear alerts apply to today only.
pub fn alerts_for(days: &[DaySummary]) -> Vec<Alert> {
    let Some(today) = days.iter().find(|d| d.day_offset == 0) else {
        return Vec::new();
    };
    let mut alerts = Vec::new();
    if today.needs_rain_gear {
        alerts.push(RAIN_ALERT);
    }
    if today.needs_snow_gear {
        alerts.push(SNOW_ALERT);
    }
    alerts
}

fn day_view(day: &DaySummary) -> DayView<'_> {
    DayView {
        offset: day.day_offset,
        day_name: &day.date.day_name,
        day: day.date.day,
        month: &day.date.month,
        icon: day.dominant_condition.icon(),
        high: day.high_temp,
        low: day.low_temp,
        description: &day.description,
        clothing: clothing_items(&day.clothing),
    }
}

fn clothing_items(c: &ClothingRecommendation) -> Vec<ClothingItem<'_>> {
    [
        ("👕", &c.top),
        ("👖", &c.bottom),
        ("👟", &c.footwear),
        ("🧥", &c.outerwear),
        ("🧢", &c.accessories),
    ]
    .into_iter()
    .filter_map(|(icon, slot)| slot.as_deref().map(|text| ClothingItem { icon, text }))
    .collect()
}
