//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - constructs the store client (REST or synthetic sample)
//! - runs the forecast pipeline
//! - prints the JSON response (and optional summary)

use chrono::Local;
use clap::Parser;

use crate::cli::{Cli, Command, PredictArgs};
use crate::data::{RestStore, SampleStore};
use crate::error::ApiError;

pub mod pipeline;

/// Entry point for the `ef` binary.
pub fn run() -> Result<(), ApiError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_predict(args: PredictArgs) -> Result<(), ApiError> {
    let now = args.asof.unwrap_or_else(|| Local::now().date_naive());

    let response = if args.sample {
        let store = SampleStore::new(args.sample_months, now, args.seed);
        pipeline::run_forecast(&store, &args.building, now)?
    } else {
        let store = RestStore::from_env()?;
        pipeline::run_forecast(&store, &args.building, now)?
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .map_err(|e| ApiError::upstream(format!("Failed to encode response: {e}")))?;
    println!("{json}");

    if args.summary {
        println!("{}", crate::report::format_summary(&args.building, &response));
    }

    Ok(())
}
