//! # Run Subcommand
//!
//! Loads a pipeline document, executes it, prints the terminal snapshot,
//! and maps the final status to the process exit code:
//!
//! | Status      | Exit code |
//! |-------------|-----------|
//! | `Fulfilled` | 0         |
//! | `Failed`    | 2         |
//! | `Unsettled` | 3         |
//!
//! Misuse of the chain (a non-callable handler, a step after a pending seed)
//! is an error and exits 1 from `main`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;
use settle_chain::SettlementStatus;
use tracing::info;

use crate::pipeline::{Outcome, Pipeline};

/// Arguments for the `settle run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a YAML or JSON pipeline document.
    pub pipeline: PathBuf,

    /// Output format for the snapshot.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also print the snapshot of every intermediate link.
    #[arg(long)]
    pub links: bool,
}

/// Output format for rendered snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Execute the `run` subcommand and return the exit code.
pub fn run_pipeline(args: &RunArgs) -> Result<u8> {
    let source = std::fs::read_to_string(&args.pipeline)
        .with_context(|| format!("failed to read {}", args.pipeline.display()))?;
    let pipeline = Pipeline::parse(&source)
        .with_context(|| format!("failed to load {}", args.pipeline.display()))?;

    info!(
        path = %args.pipeline.display(),
        steps = pipeline.steps.len(),
        "running pipeline"
    );
    let outcome = pipeline.execute()?;
    info!(status = %outcome.status, "pipeline finished");

    println!("{}", render(&outcome, args.format, args.links)?);
    Ok(exit_code(outcome.status))
}

/// Render the outcome. With `links`, the document holds every link
/// snapshot alongside the terminal result.
pub fn render(outcome: &Outcome, format: OutputFormat, links: bool) -> Result<String> {
    let document = if links {
        json!({ "links": outcome.links, "result": outcome.terminal })
    } else {
        outcome.terminal.clone()
    };
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&document)?,
        OutputFormat::Yaml => serde_yaml::to_string(&document)?,
    };
    Ok(rendered)
}

/// Exit code for a final status.
pub fn exit_code(status: SettlementStatus) -> u8 {
    match status {
        SettlementStatus::Fulfilled => 0,
        SettlementStatus::Failed => 2,
        SettlementStatus::Unsettled => 3,
    }
}
