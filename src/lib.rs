//! `eia-tracker` library crate.
//!
//! The binary (`eia`) is a thin wrapper around this library so that:
//!
//! - the view pipeline is testable without spawning processes or a terminal
//! - data sources and the forecaster sit behind traits and can be stubbed
//! - the CLI and the TUI share one implementation of every computation

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
