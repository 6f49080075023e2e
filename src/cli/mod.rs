//! Command-line parsing for the EIA retail price tracker.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::Granularity;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eia", version, about = "Electricity retail price tracker (EIA-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print KPIs, the trend insight, and a price chart for one selection.
    Summary(ViewArgs),
    /// List the sectors and date range available for a region.
    Sectors(SourceArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying view pipeline as `eia summary`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ViewArgs),
}

/// Where the data comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Region (state) code to fetch, e.g. NY.
    #[arg(short = 'r', long, default_value = "NY")]
    pub region: String,

    /// Use a synthetic offline dataset instead of calling the EIA API.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Selection and output options shared by `summary` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Sector label (defaults to the first sector in the data).
    #[arg(short = 's', long)]
    pub sector: Option<String>,

    /// First month to include (YYYY-MM or YYYY-MM-DD).
    #[arg(long, value_parser = parse_month_arg)]
    pub start: Option<NaiveDate>,

    /// Last month to include (YYYY-MM or YYYY-MM-DD).
    #[arg(long, value_parser = parse_month_arg)]
    pub end: Option<NaiveDate>,

    /// Chart granularity.
    #[arg(short = 'g', long, value_enum, default_value_t = Granularity::Monthly)]
    pub granularity: Granularity,

    /// Overlay a 12-month forecast (monthly granularity only).
    #[arg(short = 'f', long)]
    pub forecast: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the charted series (and forecast) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the chart spec to JSON.
    #[arg(long = "export-chart")]
    pub export_chart: Option<PathBuf>,
}

/// Options for plotting a saved chart.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Chart JSON file produced by `eia summary --export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Parse `YYYY-MM` or `YYYY-MM-DD` into the first day of that month.
pub fn parse_month_arg(raw: &str) -> Result<NaiveDate, String> {
    crate::data::eia::parse_period(raw)
        .ok_or_else(|| format!("Invalid month '{raw}'. Expected YYYY-MM or YYYY-MM-DD."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_args() {
        assert_eq!(parse_month_arg("2021-06"), Ok(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()));
        assert_eq!(parse_month_arg("2021-06-30"), Ok(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()));
        assert!(parse_month_arg("June 2021").is_err());
    }

    #[test]
    fn summary_flags_parse() {
        let cli = Cli::parse_from([
            "eia", "summary", "-r", "CA", "--sector", "residential", "--start", "2020-01",
            "--granularity", "yearly", "--forecast", "--sample",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.source.region, "CA");
        assert!(args.source.sample);
        assert_eq!(args.sector.as_deref(), Some("residential"));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(args.end, None);
        assert_eq!(args.granularity, Granularity::Yearly);
        assert!(args.forecast);
    }
}
