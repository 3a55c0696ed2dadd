//! Shared data model: locations, seasons, archive series and per-season results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::ThermochronCurve;

/// A geocoded US ZIP code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zip_code: String,
    pub name: String, // "New Haven, Connecticut"
    pub latitude: f64,
    pub longitude: f64,
}

/// A bounded, ordered date range supplying one engine invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub label: String, // "Winter 2023-24"
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Daily highs with their dates, index-aligned and gap-filtered
///
/// Both vectors always have the same length; days with a missing reading are
/// absent from both, so the series may be shorter than the calendar span.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyHighs {
    pub dates: Vec<NaiveDate>,
    pub temps: Vec<f64>,
}

impl DailyHighs {
    /// Pair up raw archive rows, dropping days without a finite reading
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut series = Self::default();
        for (date, reading) in readings {
            if let Some(temp) = reading.filter(|t| t.is_finite()) {
                series.dates.push(date);
                series.temps.push(temp);
            }
        }
        series
    }

    pub fn len(&self) -> usize {
        self.temps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temps.is_empty()
    }
}

/// Curve for one season at one location, plus the series it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermochronResult {
    pub season: Season,
    pub location: Location,
    pub k_values: Vec<usize>,
    pub thermochron_values: Vec<f64>,
    pub daily_highs: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

impl ThermochronResult {
    pub fn new(season: Season, location: Location, series: DailyHighs, curve: ThermochronCurve) -> Self {
        let (k_values, thermochron_values) = curve.into_parts();
        Self {
            season,
            location,
            k_values,
            thermochron_values,
            daily_highs: series.temps,
            dates: series.dates,
        }
    }

    /// thermochron(k) for a 1-based streak length
    pub fn value_at(&self, k: usize) -> Option<f64> {
        k.checked_sub(1)
            .and_then(|i| self.thermochron_values.get(i))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_readings_drops_gaps() {
        let series = DailyHighs::from_readings(vec![
            (day(1), Some(31.0)),
            (day(2), None),
            (day(3), Some(f64::NAN)),
            (day(4), Some(28.5)),
        ]);

        assert_eq!(series.dates, vec![day(1), day(4)]);
        assert_eq!(series.temps, vec![31.0, 28.5]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_result_serializes_dates_as_iso() {
        let result = ThermochronResult {
            season: Season {
                label: "Winter 2023-24".to_string(),
                start: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            },
            location: Location {
                zip_code: "06515".to_string(),
                name: "New Haven, Connecticut".to_string(),
                latitude: 41.3,
                longitude: -72.9,
            },
            k_values: vec![1],
            thermochron_values: vec![30.0],
            daily_highs: vec![30.0],
            dates: vec![day(5)],
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"start\":\"2023-10-01\""));
        assert!(json.contains("\"dates\":[\"2024-01-05\"]"));
        assert_eq!(result.value_at(1), Some(30.0));
        assert_eq!(result.value_at(2), None);
    }
}
