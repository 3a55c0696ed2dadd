//! Pipeline Cache Tests
//!
//! Runs the real Open-Meteo runner end to end against a pre-seeded disk
//! cache, so no request ever leaves the machine.

use chrono::NaiveDate;
use serde_json::json;
use tempfile::TempDir;
use thermochron::cache::DiskCache;
use thermochron::render::{self, OutputFormat, RenderOptions};
use thermochron::{open_meteo_runner, Config, RunRequest};

fn seeded_config(tmp: &TempDir) -> Config {
    let cache = DiskCache::new(tmp.path());

    cache
        .write(
            "geo_06515.json",
            &json!({
                "zip_code": "06515",
                "name": "New Haven, Connecticut",
                "latitude": 41.308_349,
                "longitude": -72.927_96
            }),
        )
        .unwrap();

    // Past season: never expires. Coordinates are rounded to 4 decimals in the key.
    cache
        .write(
            "highs_41.3083_-72.928_2022-10-01_2023-03-31.json",
            &json!({
                "dates": ["2022-12-20", "2022-12-21", "2022-12-23", "2022-12-24", "2022-12-25"],
                "temps": [30.0, 20.0, 40.0, 10.0, 50.0]
            }),
        )
        .unwrap();

    Config {
        cache_dir: tmp.path().to_path_buf(),
        // Unroutable; any cache miss fails fast instead of touching the network
        geocoding_url: "http://127.0.0.1:9/v1/search".to_string(),
        archive_url: "http://127.0.0.1:9/v1/archive".to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_run_from_cache() {
    let tmp = TempDir::new().unwrap();
    let runner = open_meteo_runner(&seeded_config(&tmp)).unwrap();

    let request = RunRequest {
        zip_code: "06515".to_string(),
        seasons: Some(vec![2022]),
        reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
    };
    let results = runner.run(&request).await.unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.season.label, "Winter 2022-23");
    assert_eq!(result.location.name, "New Haven, Connecticut");
    assert_eq!(result.thermochron_values, vec![10.0, 30.0, 40.0, 40.0, 50.0]);
    // Gap on 2022-12-22 stays a gap; dates remain aligned with readings
    assert_eq!(result.dates.len(), result.daily_highs.len());
    assert_eq!(result.dates[2], NaiveDate::from_ymd_opt(2022, 12, 23).unwrap());

    let md = render::render(&results, OutputFormat::Markdown, &RenderOptions::default()).unwrap();
    assert!(md.contains("| 2 | 30.0 |"));
}

#[tokio::test]
async fn test_cache_miss_surfaces_http_error() {
    let tmp = TempDir::new().unwrap();
    let runner = open_meteo_runner(&seeded_config(&tmp)).unwrap();

    // Season 2021 is not cached and the archive URL is unreachable
    let request = RunRequest {
        zip_code: "06515".to_string(),
        seasons: Some(vec![2021]),
        reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
    };
    let err = runner.run(&request).await.unwrap_err();
    assert!(matches!(err, thermochron::ThermochronError::Http { .. }), "{:?}", err);
}

#[test]
fn test_flush_clears_seeded_entries() {
    let tmp = TempDir::new().unwrap();
    let config = seeded_config(&tmp);

    let removed = DiskCache::new(config.cache_dir.clone()).flush().unwrap();
    assert_eq!(removed, 2);
}
