//! Error types for the collaborators around the engine.
//!
//! The engine itself is total and never fails; everything here comes from
//! geocoding, archive fetches, season construction, the disk cache and
//! rendering.

use chrono::NaiveDate;
use thiserror::Error;

/// Crate result alias
pub type Result<T> = std::result::Result<T, ThermochronError>;

/// Errors raised by the thermochron collaborators
#[derive(Debug, Error)]
pub enum ThermochronError {
    /// The geocoder returned no usable US match for a ZIP code.
    #[error("Could not geocode ZIP code: {zip_code}")]
    NotFound {
        /// ZIP code that failed to resolve
        zip_code: String,
    },

    /// Network or HTTP-level failure talking to a remote service.
    #[error("Failed to fetch {url}: {source}")]
    Http {
        /// Request URL (without secrets; Open-Meteo needs none)
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote response was well-formed JSON but unusable.
    #[error("Data error: {0}")]
    Data(String),

    /// Requested season starts after the reference date.
    #[error("Season {year} hasn't started yet (starts {start})")]
    SeasonNotStarted {
        /// Season start year
        year: i32,
        /// Oct 1 of that year
        start: NaiveDate,
    },

    /// Caller supplied an argument outside the accepted domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Disk cache I/O failed.
    #[error("Cache I/O error: {0}")]
    Cache(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background compute task panicked or was cancelled.
    #[error("Compute task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ThermochronError {
    /// Create a NotFound error.
    pub fn not_found(zip_code: impl Into<String>) -> Self {
        Self::NotFound {
            zip_code: zip_code.into(),
        }
    }

    /// Create a Data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}
