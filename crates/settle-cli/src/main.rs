//! # settle CLI entry point
//!
//! Parses command-line arguments, configures logging, and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use settle_cli::run::{run_pipeline, RunArgs};

/// settle — synchronous settlement chains.
///
/// Runs then/catch pipelines through a settlement chain and prints the
/// terminal `{status, value}` snapshot.
#[derive(Parser, Debug)]
#[command(name = "settle", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a pipeline document and print its terminal snapshot.
    Run(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("settle CLI starting");

    let result = match cli.command {
        Commands::Run(args) => run_pipeline(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_cli::run::OutputFormat;

    #[test]
    fn cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["settle", "run", "pipeline.yaml"]).unwrap();
        let Commands::Run(args) = cli.command;
        assert_eq!(args.pipeline.to_str(), Some("pipeline.yaml"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.links);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_run_with_flags() {
        let cli =
            Cli::try_parse_from(["settle", "-vv", "run", "p.json", "--format", "yaml", "--links"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.format, OutputFormat::Yaml);
        assert!(args.links);
    }

    #[test]
    fn cli_requires_pipeline_path() {
        assert!(Cli::try_parse_from(["settle", "run"]).is_err());
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["settle", "run", "p.yaml", "--format", "toml"]).is_err());
    }
}
