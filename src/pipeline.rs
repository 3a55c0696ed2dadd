//! Orchestrator: geocode once, fetch each season, compute curves.
//!
//! Fetches run one season at a time (the archive is a shared public service).
//! Curve computation is CPU-bound and independent per season, so it fans out
//! over Rayon on tokio's blocking pool once every series is in hand.

use chrono::{Local, NaiveDate};
use rayon::prelude::*;

use crate::engine;
use crate::error::Result;
use crate::geocoding::LocationResolver;
use crate::season::{default_season_years, winter_season, DEFAULT_SEASON_COUNT};
use crate::types::{DailyHighs, Location, Season, ThermochronResult};
use crate::weather::WeatherSource;

/// One pipeline invocation
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub zip_code: String,
    /// Season start years; `None` means the last ten seasons
    pub seasons: Option<Vec<i32>>,
    /// Override for "today"
    pub reference_date: Option<NaiveDate>,
}

impl RunRequest {
    pub fn new(zip_code: impl Into<String>) -> Self {
        Self {
            zip_code: zip_code.into(),
            ..Default::default()
        }
    }
}

pub struct ThermochronRunner<R, W> {
    resolver: R,
    weather: W,
}

impl<R, W> ThermochronRunner<R, W>
where
    R: LocationResolver,
    W: WeatherSource,
{
    pub fn new(resolver: R, weather: W) -> Self {
        Self { resolver, weather }
    }

    /// Full pipeline; results follow the requested season order
    pub async fn run(&self, request: &RunRequest) -> Result<Vec<ThermochronResult>> {
        let reference_date = request
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let years = request
            .seasons
            .clone()
            .unwrap_or_else(|| default_season_years(reference_date, DEFAULT_SEASON_COUNT));

        let location = self.resolver.resolve(&request.zip_code).await?;
        tracing::info!(
            "Location: {} ({:.4}, {:.4})",
            location.name,
            location.latitude,
            location.longitude
        );

        let mut fetched: Vec<(Season, DailyHighs)> = Vec::with_capacity(years.len());
        for year in years {
            let season = winter_season(year, reference_date)?;
            tracing::info!("Fetching {}: {} to {}", season.label, season.start, season.end);

            let series = self.weather.fetch(&location, season.start, season.end).await?;
            fetched.push((season, series));
        }

        // Rayon blocks its caller; keep it off the async worker threads
        let results = tokio::task::spawn_blocking(move || compute_seasons(&location, fetched)).await?;

        Ok(results)
    }
}

/// Curves for already-fetched seasons, in parallel; output keeps input order
pub fn compute_seasons(location: &Location, fetched: Vec<(Season, DailyHighs)>) -> Vec<ThermochronResult> {
    fetched
        .into_par_iter()
        .map(|(season, series)| {
            let curve = engine::compute(&series.temps);
            ThermochronResult::new(season, location.clone(), series, curve)
        })
        .collect()
}
