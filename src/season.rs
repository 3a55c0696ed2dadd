//! Season Generator
//!
//! A winter season runs Oct 1 of its start year through Mar 31 of the
//! following year. Seasons still in progress end at the reference date.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, ThermochronError};
use crate::types::Season;

/// Number of seasons requested when the caller names none
pub const DEFAULT_SEASON_COUNT: usize = 10;

/// Build the winter season starting in `year`
///
/// Fails with `SeasonNotStarted` when Oct 1 of `year` is after
/// `reference_date`.
pub fn winter_season(year: i32, reference_date: NaiveDate) -> Result<Season> {
    let start = ymd(year, 10, 1)?;
    let nominal_end = ymd(year + 1, 3, 31)?;

    if start > reference_date {
        return Err(ThermochronError::SeasonNotStarted { year, start });
    }

    Ok(Season {
        label: season_label(year),
        start,
        end: nominal_end.min(reference_date),
    })
}

/// "Winter 2023-24"
pub fn season_label(year: i32) -> String {
    format!("Winter {}-{:02}", year, (year + 1).rem_euclid(100))
}

/// Start year of the season containing (or most recently before) `reference_date`
pub fn current_season_year(reference_date: NaiveDate) -> i32 {
    if reference_date.month() >= 10 {
        reference_date.year()
    } else {
        reference_date.year() - 1
    }
}

/// The `count` most recent season start years, oldest first, ending with the current season
pub fn default_season_years(reference_date: NaiveDate, count: usize) -> Vec<i32> {
    let current = current_season_year(reference_date);
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    (0..count).rev().map(|back| current - back).collect()
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ThermochronError::InvalidInput(format!("{}-{:02}-{:02} is not a valid date", year, month, day))
    })
}
