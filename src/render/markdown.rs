use crate::engine;
use crate::render::RenderOptions;
use crate::types::ThermochronResult;

/// Streak length whose coldest window is called out below the table
const STREAK_REPORT_K: usize = 7;

/// Markdown formatter for thermochron results
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format results as a markdown report
    pub fn format(results: &[ThermochronResult], options: &RenderOptions) -> String {
        let mut md = String::with_capacity(4096);

        md.push_str(&format!("# {}\n\n", options.title_for(results)));
        if let Some(first) = results.first() {
            md.push_str(&format!(
                "ZIP {} ({:.4}, {:.4})\n\n",
                first.location.zip_code, first.location.latitude, first.location.longitude
            ));
        }
        md.push_str("*thermochron(k) = coldest k-day streak's highest daily high*\n\n");

        // Header
        md.push_str("| k |");
        for result in results {
            md.push_str(&format!(" {} |", result.season.label));
        }
        md.push('\n');
        md.push_str("|---|");
        for _ in results {
            md.push_str("---|");
        }
        md.push('\n');

        let longest = results.iter().map(|r| r.k_values.len()).max().unwrap_or(0);
        for k in 1..=longest.min(options.max_k) {
            md.push_str(&format!("| {} |", k));
            for result in results {
                match result.value_at(k) {
                    Some(v) => md.push_str(&format!(" {:.1} |", v)),
                    None => md.push_str(" - |"),
                }
            }
            md.push('\n');
        }

        md.push_str(&format!("\n## Coldest {}-day streaks\n\n", STREAK_REPORT_K));
        for result in results {
            md.push_str(&format!("- **{}**: {}\n", result.season.label, Self::streak_line(result, options)));
        }

        md
    }

    fn streak_line(result: &ThermochronResult, options: &RenderOptions) -> String {
        let window = engine::coldest_window(&result.daily_highs, STREAK_REPORT_K);
        let dates = window.and_then(|w| Some((w, result.dates.get(w.start)?, result.dates.get(w.end())?)));

        match dates {
            Some((window, first, last)) => format!(
                "{} to {}, never above {:.1}{}",
                first, last, window.peak, options.unit_symbol
            ),
            None => format!(
                "only {} days of data (need {})",
                result.daily_highs.len(),
                STREAK_REPORT_K
            ),
        }
    }
}
