//! LittleWeather: fetches a short forecast, works out what to wear, and serves
//! it as a static page that is regenerated on a timer.

pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod forecast;
pub mod output;
pub mod refresh;
pub mod render;
pub mod types;
