//! rtlcheck CLI: run verification sessions against the behavioural designs.
//!
//! Provides `rtlcheck run` to drive a configured session to a verdict and
//! `rtlcheck check` to validate a session file without simulating it.

#![warn(missing_docs)]

mod check;
mod run;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rtlcheck_config::Defect;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "RTLCHECK_LOG";

/// Exit code used when the session could not be run at all.
const EXIT_ERROR: i32 = 2;

/// rtlcheck: transaction-level checking of data-structure hardware.
#[derive(Parser, Debug)]
#[command(name = "rtlcheck", version, about = "rtlcheck verification runner")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a verification session and report the verdict.
    Run(RunArgs),
    /// Validate a session file without running it.
    Check(CheckArgs),
}

/// Arguments for the `rtlcheck run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Session file, or a directory containing `rtlcheck.toml`.
    pub config: String,

    /// Override the random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of random operations.
    #[arg(long)]
    pub operations: Option<usize>,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Inject a defect into the design (e.g., `--defect drop_fault`).
    #[arg(long, num_args = 1..)]
    pub defect: Vec<Defect>,

    /// Write a VCD trace of the run to this path.
    #[arg(long)]
    pub vcd: Option<String>,
}

/// Arguments for the `rtlcheck check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Session file, or a directory containing `rtlcheck.toml`.
    pub config: String,

    /// Summary output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

impl GlobalArgs {
    /// The log filter used when `RTLCHECK_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("error: {e}");
            process::exit(EXIT_ERROR);
        }
    }
}

/// Installs the stderr log subscriber.
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(global.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_default() {
        let cli = Cli::parse_from(["rtlcheck", "run", "fifo.toml"]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.config, "fifo.toml");
                assert!(args.seed.is_none());
                assert!(args.operations.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.defect.is_empty());
                assert!(args.vcd.is_none());
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_with_args() {
        let cli = Cli::parse_from([
            "rtlcheck",
            "run",
            "sessions/",
            "--seed",
            "42",
            "--operations",
            "500",
            "--format",
            "json",
            "--defect",
            "drop_fault",
            "never-done",
            "--vcd",
            "out.vcd",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.operations, Some(500));
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.defect, vec![Defect::DropFault, Defect::NeverDone]);
                assert_eq!(args.vcd.as_deref(), Some("out.vcd"));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_rejects_unknown_defect() {
        let res = Cli::try_parse_from(["rtlcheck", "run", "a.toml", "--defect", "melt"]);
        assert!(res.is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["rtlcheck", "check", "rtlcheck.toml", "-f", "json"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.config, "rtlcheck.toml");
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["rtlcheck", "--quiet", "check", "a.toml"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        let cli = Cli::parse_from(["rtlcheck", "run", "a.toml", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn default_filter_follows_flags() {
        let filter = |quiet, verbose| GlobalArgs { quiet, verbose }.default_filter();
        assert_eq!(filter(false, false), "warn");
        assert_eq!(filter(false, true), "debug");
        assert_eq!(filter(true, false), "error");
        assert_eq!(filter(true, true), "error");
    }
}
