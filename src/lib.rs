//! Thermochron
//!
//! For a season of daily highs, and every streak length k, finds the coldest
//! k-day window (the one whose warmest day is coldest) and reports that
//! window's peak as thermochron(k).
//!
//! Layout:
//! - `engine`: the pure curve computation (sliding-window max, O(n²))
//! - `season`, `geocoding`, `weather`, `cache`: collaborators feeding it
//! - `pipeline`: ZIP code + seasons → per-season curves
//! - `render`: SVG / Markdown / JSON output
//! - `api_server`: HTTP surface (feature `api`)

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod pipeline;
pub mod render;
pub mod season;
pub mod types;
pub mod weather;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use config::Config;
pub use engine::{compute, ThermochronCurve};
pub use error::{Result, ThermochronError};
pub use geocoding::{LocationResolver, OpenMeteoGeocoder};
pub use pipeline::{RunRequest, ThermochronRunner};
pub use types::{DailyHighs, Location, Season, ThermochronResult};
pub use weather::{OpenMeteoArchive, WeatherSource};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};

/// Runner wired to the live Open-Meteo services with a shared disk cache
pub type OpenMeteoRunner = ThermochronRunner<OpenMeteoGeocoder, OpenMeteoArchive>;

/// Build an [`OpenMeteoRunner`] from configuration (no network access yet)
pub fn open_meteo_runner(config: &Config) -> Result<OpenMeteoRunner> {
    let client = http::build_client(config)?;
    let cache = cache::DiskCache::new(config.cache_dir.clone());
    Ok(ThermochronRunner::new(
        OpenMeteoGeocoder::new(client.clone(), config, cache.clone()),
        OpenMeteoArchive::new(client, config, cache),
    ))
}
