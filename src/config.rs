//! Runtime configuration
//!
//! Defaults target the public Open-Meteo endpoints with Fahrenheit highs in
//! US Eastern time. Every field can be overridden from the environment,
//! e.g. `THERMOCHRON_CACHE_DIR=/tmp/tc thermochron --zip 02139`.

use std::path::PathBuf;
use std::time::Duration;

pub const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_TEMPERATURE_UNIT: &str = "fahrenheit";

/// Recent archive data expires after one hour
pub const CACHE_MAX_AGE_SECONDS: u64 = 3600;
pub const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Directory name under $HOME holding cached responses
pub const CACHE_DIR_NAME: &str = ".thermochron_cache";

#[derive(Debug, Clone)]
pub struct Config {
    pub geocoding_url: String,
    pub archive_url: String,
    pub timezone: String,
    pub temperature_unit: String,
    pub cache_dir: PathBuf,
    /// Max age for archive entries whose range ends on or after yesterday
    pub recent_cache_max_age: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: OPEN_METEO_GEOCODING_URL.to_string(),
            archive_url: OPEN_METEO_ARCHIVE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            temperature_unit: DEFAULT_TEMPERATURE_UNIT.to_string(),
            cache_dir: default_cache_dir(),
            recent_cache_max_age: Duration::from_secs(CACHE_MAX_AGE_SECONDS),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    /// Defaults overridden by `THERMOCHRON_*` environment variables
    ///
    /// Unparseable numeric overrides are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("THERMOCHRON_GEOCODING_URL") {
            config.geocoding_url = url;
        }
        if let Some(url) = lookup("THERMOCHRON_ARCHIVE_URL") {
            config.archive_url = url;
        }
        if let Some(tz) = lookup("THERMOCHRON_TIMEZONE") {
            config.timezone = tz;
        }
        if let Some(unit) = lookup("THERMOCHRON_TEMPERATURE_UNIT") {
            config.temperature_unit = unit;
        }
        if let Some(dir) = lookup("THERMOCHRON_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_secs(&lookup, "THERMOCHRON_CACHE_MAX_AGE_SECS") {
            config.recent_cache_max_age = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "THERMOCHRON_HTTP_TIMEOUT_SECS") {
            config.http_timeout = secs;
        }

        config
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: expected whole seconds", key, raw);
            None
        }
    }
}

/// `~/.thermochron_cache`, or `./.thermochron_cache` when $HOME is unknown
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.archive_url, OPEN_METEO_ARCHIVE_URL);
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.temperature_unit, "fahrenheit");
        assert_eq!(config.recent_cache_max_age, Duration::from_secs(3600));
        assert!(config.cache_dir.ends_with(CACHE_DIR_NAME));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("THERMOCHRON_TIMEZONE", "America/Denver"),
            ("THERMOCHRON_TEMPERATURE_UNIT", "celsius"),
            ("THERMOCHRON_CACHE_DIR", "/tmp/tc"),
            ("THERMOCHRON_CACHE_MAX_AGE_SECS", "60"),
            ("THERMOCHRON_HTTP_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.timezone, "America/Denver");
        assert_eq!(config.temperature_unit, "celsius");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/tc"));
        assert_eq!(config.recent_cache_max_age, Duration::from_secs(60));
        // Bad value falls back to the default
        assert_eq!(config.http_timeout, Duration::from_secs(HTTP_TIMEOUT_SECONDS));
        assert_eq!(config.geocoding_url, OPEN_METEO_GEOCODING_URL);
    }
}
