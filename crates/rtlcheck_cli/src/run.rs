//! `rtlcheck run`: drive a configured session to a verdict.
//!
//! Loads the session file, applies command-line overrides, runs the random
//! stimulus through the behavioural design, and prints the report. The exit
//! code is 0 for a passing run and 1 for a failing one.

use std::path::Path;

use rtlcheck_config::{validate_config, SessionConfig};
use rtlcheck_scoreboard::{JsonRenderer, Report, ReportRenderer, TextRenderer};

use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the `rtlcheck run` command.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = rtlcheck_config::load_config(Path::new(&args.config))?;
    apply_overrides(&mut config, args);
    validate_config(&config)?;

    if !global.quiet {
        eprintln!(
            "   Running {} ({}, {} operations)",
            config.session.name,
            config.structure.kind(),
            config.stimulus.operations
        );
    }

    let report = rtlcheck_session::verify(&config, config.stimulus.operations)?;
    tracing::info!(
        verdict = %report.verdict,
        transactions = report.transactions,
        "session finished"
    );

    let rendered = render(&report, args.format);
    if !(global.quiet && report.passed()) {
        print!("{rendered}");
        if args.format == ReportFormat::Json {
            println!();
        }
    }
    Ok(report.exit_code())
}

/// Folds command-line overrides into the loaded configuration.
fn apply_overrides(config: &mut SessionConfig, args: &RunArgs) {
    if let Some(seed) = args.seed {
        config.session.seed = Some(seed);
    }
    if let Some(operations) = args.operations {
        config.stimulus.operations = operations;
    }
    for defect in &args.defect {
        if !config.dut.defects.contains(defect) {
            config.dut.defects.push(*defect);
        }
    }
    if let Some(vcd) = &args.vcd {
        config.dut.vcd = Some(vcd.clone());
    }
}

fn render(report: &Report, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => TextRenderer::default().render(report),
        ReportFormat::Json => JsonRenderer { pretty: true }.render(report),
    }
}
