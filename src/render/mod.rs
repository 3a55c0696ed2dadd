//! Renderer
//!
//! Turns per-season results into a presentable artifact:
//! - `svg`: standalone line chart, one curve per season
//! - `markdown`: table of values per streak length plus coldest-streak dates
//! - `json`: the full results, for downstream tooling
//!
//! Display truncation (`max_k`) lives here only; the engine always computes
//! the full curve.

pub mod json;
pub mod markdown;
pub mod svg;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use svg::SvgFormatter;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, ThermochronError};
use crate::types::ThermochronResult;

/// Six weeks
pub const DEFAULT_MAX_K: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Markdown,
    Json,
}

impl OutputFormat {
    /// Infer from a file extension (`.svg`, `.md`, `.json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = ThermochronError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(ThermochronError::InvalidInput(format!(
                "Unknown output format '{}' (expected svg, markdown or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Svg => "svg",
            Self::Markdown => "markdown",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Presentation settings shared by the formatters
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Longest streak shown
    pub max_k: usize,
    /// Chart/document title; defaults to "Thermochron - {location}"
    pub title: Option<String>,
    pub unit_symbol: String,
    /// Freezing reference line, in the display unit
    pub freezing_point: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_k: DEFAULT_MAX_K,
            title: None,
            unit_symbol: "°F".to_string(),
            freezing_point: 32.0,
        }
    }
}

impl RenderOptions {
    /// Unit symbol and freezing point matching an Open-Meteo `temperature_unit`
    pub fn for_unit(temperature_unit: &str) -> Self {
        match temperature_unit {
            "celsius" => Self {
                unit_symbol: "°C".to_string(),
                freezing_point: 0.0,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn title_for(&self, results: &[ThermochronResult]) -> String {
        match (&self.title, results.first()) {
            (Some(title), _) => title.clone(),
            (None, Some(first)) => format!("Thermochron - {}", first.location.name),
            (None, None) => "Thermochron".to_string(),
        }
    }
}

/// Render `results` in the requested format
pub fn render(results: &[ThermochronResult], format: OutputFormat, options: &RenderOptions) -> Result<String> {
    if results.is_empty() {
        return Err(ThermochronError::data("No results to render"));
    }
    if options.max_k == 0 {
        return Err(ThermochronError::InvalidInput(
            "max_k must be at least 1".to_string(),
        ));
    }

    match format {
        OutputFormat::Svg => Ok(SvgFormatter::format(results, options)),
        OutputFormat::Markdown => Ok(MarkdownFormatter::format(results, options)),
        OutputFormat::Json => Ok(JsonFormatter::format(results)?),
    }
}
