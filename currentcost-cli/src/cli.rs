mod db;
mod durations;
mod export;
mod log;

use clap::{Parser, Subcommand};

pub use crate::cli::{durations::DurationsArgs, export::ExportArgs, log::LogArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: read frames from the meter, store the hourly history, and export the chart.
    #[clap(name = "log")]
    Log(Box<LogArgs>),

    /// Export the chart from the stored history only.
    #[clap(name = "export")]
    Export(ExportArgs),

    /// Print the stored history as durational readings.
    #[clap(name = "durations")]
    Durations(DurationsArgs),
}
