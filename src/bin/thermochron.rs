//! thermochron - plot the coldest-streak curve for a ZIP code
//!
//! Usage:
//!   thermochron --zip 06515                          # last 10 winters, SVG to stdout
//!   thermochron --zip 06515 --season 2022 --season 2023 -o winters.svg
//!   thermochron --zip 80302 -o curves.md             # markdown table
//!   thermochron --flush-cache --zip 06515 -o out.json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thermochron::cache::DiskCache;
use thermochron::render::{self, OutputFormat, RenderOptions, DEFAULT_MAX_K};
use thermochron::{open_meteo_runner, Config, RunRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "thermochron")]
#[command(about = "Coldest k-day streak curves for winter seasons at a US ZIP code")]
#[command(version)]
struct Cli {
    /// US ZIP code
    #[arg(long, default_value = "06515")]
    zip: String,

    /// Season start year (Oct 1 of YEAR to Mar 31 of YEAR+1); repeatable.
    /// Defaults to the last 10 seasons.
    #[arg(long = "season", value_name = "YEAR")]
    seasons: Vec<i32>,

    /// Treat this date as "today" (YYYY-MM-DD)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// svg, markdown or json (default: from output extension, else svg)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Longest streak shown (at least 1)
    #[arg(long, default_value_t = DEFAULT_MAX_K, value_parser = parse_max_k)]
    max_k: usize,

    /// Chart title (default: "Thermochron - <location>")
    #[arg(long)]
    title: Option<String>,

    /// Delete all cached responses before running
    #[arg(long)]
    flush_cache: bool,
}

fn parse_max_k(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thermochron=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if cli.flush_cache {
        DiskCache::new(config.cache_dir.clone())
            .flush()
            .context("Failed to flush cache")?;
    }

    let format = cli
        .format
        .or_else(|| cli.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();

    let runner = open_meteo_runner(&config).context("Failed to build HTTP client")?;
    let request = RunRequest {
        zip_code: cli.zip.clone(),
        seasons: (!cli.seasons.is_empty()).then(|| cli.seasons.clone()),
        reference_date: cli.reference_date,
    };

    let results = runner
        .run(&request)
        .await
        .with_context(|| format!("Thermochron run failed for ZIP {}", cli.zip))?;

    let options = RenderOptions {
        max_k: cli.max_k,
        title: cli.title.clone(),
        ..RenderOptions::for_unit(&config.temperature_unit)
    };
    let rendered = render::render(&results, format, &options)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Saved {} output to {:?}", format, path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_k_must_be_positive() {
        assert!(Cli::try_parse_from(["thermochron", "--max-k", "0"]).is_err());
        assert!(Cli::try_parse_from(["thermochron", "--max-k", "-3"]).is_err());

        let cli = Cli::try_parse_from(["thermochron", "--max-k", "1"]).unwrap();
        assert_eq!(cli.max_k, 1);

        let cli = Cli::try_parse_from(["thermochron"]).unwrap();
        assert_eq!(cli.max_k, DEFAULT_MAX_K);
    }

    #[test]
    fn test_repeated_seasons() {
        let cli = Cli::try_parse_from(["thermochron", "--season", "2022", "--season", "2023"]).unwrap();
        assert_eq!(cli.seasons, vec![2022, 2023]);
        assert_eq!(cli.zip, "06515");
    }
}
