//! Location Resolver
//!
//! Turns a US ZIP code into coordinates via the Open-Meteo geocoding API.
//! Hits are cached on disk forever (`geo_{zip}.json`); ZIP centroids do not
//! move.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::cache::DiskCache;
use crate::config::Config;
use crate::error::{Result, ThermochronError};
use crate::http;
use crate::types::Location;

/// ZIP code → coordinates
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Fails with `NotFound` when nothing matches
    async fn resolve(&self, zip_code: &str) -> Result<Location>;
}

/// Open-Meteo geocoding response
#[derive(Debug, Default, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub postcodes: Vec<String>,
}

impl GeocodingResult {
    fn is_us(&self) -> bool {
        self.country_code.as_deref() == Some("US")
    }

    fn to_location(&self, zip_code: &str) -> Location {
        Location {
            zip_code: zip_code.to_string(),
            name: format!("{}, {}", self.name, self.admin1.as_deref().unwrap_or("")),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Pick the best US match for a ZIP code
///
/// Prefers a US result listing the ZIP among its postcodes; falls back to the
/// first US result of any kind.
pub fn select_location(zip_code: &str, response: &GeocodingResponse) -> Result<Location> {
    let us_results = || response.results.iter().filter(|r| r.is_us());

    us_results()
        .find(|r| r.postcodes.iter().any(|p| p == zip_code))
        .or_else(|| us_results().next())
        .map(|r| r.to_location(zip_code))
        .ok_or_else(|| ThermochronError::not_found(zip_code))
}

pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
    cache: DiskCache,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Client, config: &Config, cache: DiskCache) -> Self {
        Self {
            client,
            base_url: config.geocoding_url.clone(),
            cache,
        }
    }

    fn cache_name(zip_code: &str) -> String {
        format!("geo_{}.json", zip_code)
    }
}

#[async_trait]
impl LocationResolver for OpenMeteoGeocoder {
    async fn resolve(&self, zip_code: &str) -> Result<Location> {
        let zip_code = zip_code.trim();
        if zip_code.is_empty() {
            return Err(ThermochronError::InvalidInput("ZIP code is empty".to_string()));
        }

        let cache_name = Self::cache_name(zip_code);
        if let Some(location) = self.cache.read::<Location>(&cache_name, None)? {
            tracing::debug!("Geocode cache hit for {}", zip_code);
            return Ok(location);
        }

        let query = [
            ("name", zip_code.to_string()),
            ("count", "10".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let response: GeocodingResponse = http::get_json(&self.client, &self.base_url, &query).await?;

        let location = select_location(zip_code, &response)?;
        self.cache.write(&cache_name, &location)?;
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeocodingResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prefers_postcode_match() {
        let response = parse(
            r#"{"results": [
                {"name": "Hamden", "latitude": 41.39, "longitude": -72.9,
                 "country_code": "US", "admin1": "Connecticut", "postcodes": ["06514"]},
                {"name": "New Haven", "latitude": 41.31, "longitude": -72.92,
                 "country_code": "US", "admin1": "Connecticut", "postcodes": ["06511", "06515"]}
            ]}"#,
        );

        let location = select_location("06515", &response).unwrap();
        assert_eq!(location.name, "New Haven, Connecticut");
        assert_eq!(location.zip_code, "06515");
        assert_eq!(location.latitude, 41.31);
    }

    #[test]
    fn test_falls_back_to_first_us_result() {
        let response = parse(
            r#"{"results": [
                {"name": "Lyon", "latitude": 45.75, "longitude": 4.85, "country_code": "FR"},
                {"name": "Springfield", "latitude": 39.8, "longitude": -89.64, "country_code": "US"}
            ]}"#,
        );

        let location = select_location("62701", &response).unwrap();
        // Missing admin1 leaves an empty suffix
        assert_eq!(location.name, "Springfield, ");
    }

    #[test]
    fn test_no_us_result_is_not_found() {
        let response = parse(
            r#"{"results": [{"name": "Lyon", "latitude": 45.75, "longitude": 4.85, "country_code": "FR"}]}"#,
        );
        let err = select_location("69001", &response).unwrap_err();
        assert!(matches!(err, ThermochronError::NotFound { .. }));

        // Open-Meteo omits `results` entirely when nothing matches
        let err = select_location("00000", &parse("{}")).unwrap_err();
        assert!(matches!(err, ThermochronError::NotFound { .. }));
    }
}
