use crate::types::ThermochronResult;

/// JSON formatter for thermochron results
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format results as pretty-printed JSON
    pub fn format(results: &[ThermochronResult]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(results)
    }

    /// Format results as compact JSON (no whitespace)
    pub fn format_compact(results: &[ThermochronResult]) -> Result<String, serde_json::Error> {
        serde_json::to_string(results)
    }
}
