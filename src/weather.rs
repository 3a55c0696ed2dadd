//! Weather Source
//!
//! Fetches daily maximum temperatures from the Open-Meteo historical archive.
//! Null readings are dropped here, together with their dates, so the engine
//! always receives a dense series.
//!
//! Cache policy: a range ending on or after yesterday can still change
//! (the archive back-fills recent days), so it expires after
//! `recent_cache_max_age`. Older ranges are cached forever.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::DiskCache;
use crate::config::Config;
use crate::error::{Result, ThermochronError};
use crate::http;
use crate::types::{DailyHighs, Location};

/// Location + inclusive date range → ordered daily highs
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, location: &Location, start: NaiveDate, end: NaiveDate) -> Result<DailyHighs>;
}

/// `daily` block of an archive response
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<Option<f64>>,
}

/// Decode an archive response body into a gap-free series
///
/// Errors when the `daily` block is missing or holds no usable readings.
pub fn parse_daily_highs(body: serde_json::Value) -> Result<DailyHighs> {
    let serde_json::Value::Object(mut fields) = body else {
        return Err(ThermochronError::data("Unexpected API response (not a JSON object)"));
    };

    let Some(daily) = fields.remove("daily") else {
        let keys: Vec<&String> = fields.keys().collect();
        return Err(ThermochronError::data(format!(
            "Unexpected API response (no 'daily' key): {:?}",
            keys
        )));
    };

    let daily: DailyBlock = serde_json::from_value(daily)?;
    if daily.time.len() != daily.temperature_2m_max.len() {
        tracing::warn!(
            "Archive returned {} dates but {} readings; truncating to the shorter",
            daily.time.len(),
            daily.temperature_2m_max.len()
        );
    }

    let series = DailyHighs::from_readings(daily.time.into_iter().zip(daily.temperature_2m_max));
    if series.is_empty() {
        return Err(ThermochronError::data("No valid temperature data for the requested range"));
    }
    Ok(series)
}

/// Max cache age for a range ending at `end`, judged against `today`
pub fn cache_max_age(end: NaiveDate, today: NaiveDate, recent_max_age: Duration) -> Option<Duration> {
    let is_recent = end >= today - ChronoDuration::days(1);
    is_recent.then_some(recent_max_age)
}

/// Coordinates rounded to 4 decimals (~11 m), shared by query and cache key
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub struct OpenMeteoArchive {
    client: Client,
    base_url: String,
    timezone: String,
    temperature_unit: String,
    recent_cache_max_age: Duration,
    cache: DiskCache,
}

impl OpenMeteoArchive {
    pub fn new(client: Client, config: &Config, cache: DiskCache) -> Self {
        Self {
            client,
            base_url: config.archive_url.clone(),
            timezone: config.timezone.clone(),
            temperature_unit: config.temperature_unit.clone(),
            recent_cache_max_age: config.recent_cache_max_age,
            cache,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoArchive {
    async fn fetch(&self, location: &Location, start: NaiveDate, end: NaiveDate) -> Result<DailyHighs> {
        if start > end {
            return Err(ThermochronError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let lat = round4(location.latitude);
        let lon = round4(location.longitude);
        let cache_name = format!("highs_{}_{}_{}_{}.json", lat, lon, start, end);

        let today = Local::now().date_naive();
        let max_age = cache_max_age(end, today, self.recent_cache_max_age);

        if let Some(series) = self.cache.read::<DailyHighs>(&cache_name, max_age)? {
            tracing::info!("  Using cached data ({} days)", series.len());
            return Ok(series);
        }

        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("start_date", start.to_string()),
            ("end_date", end.to_string()),
            ("daily", "temperature_2m_max".to_string()),
            ("temperature_unit", self.temperature_unit.clone()),
            ("timezone", self.timezone.clone()),
        ];
        let body: serde_json::Value = http::get_json(&self.client, &self.base_url, &query).await?;
        let series = parse_daily_highs(body)?;

        self.cache.write(&cache_name, &series)?;
        tracing::info!("  Fetched {} days from API", series.len());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_filters_nulls() {
        let body = json!({
            "latitude": 41.3,
            "daily": {
                "time": ["2024-01-01", "2024-01-02", "2024-01-03"],
                "temperature_2m_max": [33.1, null, 29.4]
            }
        });

        let series = parse_daily_highs(body).unwrap();
        assert_eq!(series.dates, vec![date(2024, 1, 1), date(2024, 1, 3)]);
        assert_eq!(series.temps, vec![33.1, 29.4]);
    }

    #[test]
    fn test_parse_missing_daily_block() {
        let err = parse_daily_highs(json!({"error": true, "reason": "bad range"})).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no 'daily' key"));
        assert!(msg.contains("reason"));
    }

    #[test]
    fn test_parse_all_null_is_data_error() {
        let body = json!({
            "daily": {"time": ["2024-01-01"], "temperature_2m_max": [null]}
        });
        let err = parse_daily_highs(body).unwrap_err();
        assert!(matches!(err, ThermochronError::Data(_)));
    }

    #[test]
    fn test_cache_max_age_for_recent_ranges() {
        let today = date(2026, 1, 10);
        let hour = Duration::from_secs(3600);

        assert_eq!(cache_max_age(date(2026, 1, 10), today, hour), Some(hour));
        assert_eq!(cache_max_age(date(2026, 1, 9), today, hour), Some(hour));
        assert_eq!(cache_max_age(date(2026, 1, 8), today, hour), None);
        assert_eq!(cache_max_age(date(2023, 3, 31), today, hour), None);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(41.308_349), 41.3083);
        assert_eq!(round4(-72.927_96), -72.928);
    }
}
