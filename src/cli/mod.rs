//! Command-line parsing for the expense forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/modeling code.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ef", version, about = "Building expense forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast one building's monthly expenses and print the JSON response.
    Predict(PredictArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Building identifier to forecast.
    #[arg(short = 'b', long)]
    pub building: String,

    /// Processing date (YYYY-MM-DD); pins "now" for reproducible output.
    /// Defaults to the local calendar date.
    #[arg(long)]
    pub asof: Option<NaiveDate>,

    /// Use the deterministic synthetic ledger instead of the REST store.
    #[arg(long)]
    pub sample: bool,

    /// Months of synthetic history to generate with --sample.
    #[arg(long, default_value_t = 24)]
    pub sample_months: usize,

    /// Seed for the synthetic ledger.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Pretty-print the JSON response.
    #[arg(long)]
    pub pretty: bool,

    /// Also print a human-readable run summary to stdout.
    #[arg(long)]
    pub summary: bool,
}
