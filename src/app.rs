//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - loads the region's dataset (once)
//! - runs the view pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::pipeline::{ViewRequest, build_view, resolve_criteria};
use crate::cli::{Command, PlotArgs, SourceArgs, ViewArgs};
use crate::data::{EiaClient, MemoizedDataset, PriceSource, SampleSource};
use crate::error::AppError;
use crate::forecast::SeasonalTrendForecaster;

pub mod pipeline;

/// Entry point for the `eia` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    // We want `eia` and `eia -s residential` to behave like `eia tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Sectors(args) => handle_sectors(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pick the data source for the run and wrap it for one-time loading.
pub fn open_dataset(args: &SourceArgs) -> MemoizedDataset {
    let source: Box<dyn PriceSource> = if args.sample {
        Box::new(SampleSource::new(args.seed))
    } else {
        Box::new(EiaClient::from_env())
    };
    MemoizedDataset::new(source, args.region.trim().to_uppercase())
}

fn handle_summary(args: ViewArgs) -> Result<(), AppError> {
    let memo = open_dataset(&args.source);
    let dataset = memo.require()?;

    let request = ViewRequest {
        criteria: resolve_criteria(dataset, args.sector.as_deref(), args.start, args.end)?,
        granularity: args.granularity,
        forecast: args.forecast,
    };
    let view = build_view(dataset, &request, &SeasonalTrendForecaster::default());

    println!("{}", crate::report::format_run_summary(dataset, &view));

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::render_ascii_chart(&view.chart, args.width, args.height)
        );
    }

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &view.chart)?;
    }
    if let Some(path) = &args.export_chart {
        crate::io::write_chart_json(path, &view.chart)?;
    }

    Ok(())
}

fn handle_sectors(args: SourceArgs) -> Result<(), AppError> {
    let memo = open_dataset(&args);
    let dataset = memo.require()?;
    print!("{}", crate::report::format_sector_list(dataset));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::read_chart_json(&args.chart)?;
    println!("{}", crate::plot::render_ascii_chart(&chart, args.width, args.height));
    Ok(())
}

/// Rewrite argv so `eia` defaults to `eia tui`.
///
/// Rules:
/// - `eia`                       -> `eia tui`
/// - `eia -s residential ...`    -> `eia tui -s residential ...`
/// - `eia --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "sectors" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["eia"])), args(&["eia", "tui"]));
        assert_eq!(
            rewrite_args(args(&["eia", "-s", "commercial"])),
            args(&["eia", "tui", "-s", "commercial"])
        );
        assert_eq!(rewrite_args(args(&["eia", "--help"])), args(&["eia", "--help"]));
        assert_eq!(
            rewrite_args(args(&["eia", "summary", "--sample"])),
            args(&["eia", "summary", "--sample"])
        );
    }
}
