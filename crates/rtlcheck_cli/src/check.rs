//! `rtlcheck check`: validate a session file without simulating it.

use std::path::Path;

use rtlcheck_common::OpKind;
use rtlcheck_config::SessionConfig;
use rtlcheck_stimulus::{resolve_weights, DEFAULT_SEED};

use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `rtlcheck check` command.
///
/// Prints the effective session settings and the resolved operation mix.
/// Returns 0 when the file is valid; load and validation failures are
/// returned as errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = rtlcheck_config::load_config(Path::new(&args.config))?;
    let weights = resolve_weights(config.structure.kind(), &config.stimulus.weights)?;
    tracing::debug!(name = %config.session.name, ?weights, "session file valid");

    if !global.quiet {
        let out = match args.format {
            ReportFormat::Text => summary_text(&config, &weights),
            ReportFormat::Json => summary_json(&config, &weights).to_string(),
        };
        println!("{out}");
    }
    Ok(0)
}

fn summary_text(config: &SessionConfig, weights: &[(OpKind, u32)]) -> String {
    let mix = weights
        .iter()
        .map(|(op, w)| format!("{op} {w}"))
        .collect::<Vec<_>>()
        .join(", ");
    let defects = if config.dut.defects.is_empty() {
        "none".to_string()
    } else {
        config
            .dut
            .defects
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{} ({}): ok\n  seed: {}\n  operations: {}\n  mix: {}\n  defects: {}",
        config.session.name,
        config.structure.kind(),
        config.session.seed.unwrap_or(DEFAULT_SEED),
        config.stimulus.operations,
        mix,
        defects
    )
}

fn summary_json(config: &SessionConfig, weights: &[(OpKind, u32)]) -> serde_json::Value {
    let mix: serde_json::Map<String, serde_json::Value> = weights
        .iter()
        .map(|(op, w)| (op.name().to_string(), serde_json::Value::from(*w)))
        .collect();
    serde_json::json!({
        "name": config.session.name,
        "structure": config.structure.kind().name(),
        "seed": config.session.seed.unwrap_or(DEFAULT_SEED),
        "operations": config.stimulus.operations,
        "weights": mix,
        "defects": config.dut.defects.iter().map(|d| d.name()).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlcheck_config::load_config_from_str;
    use std::fs;
    use tempfile::TempDir;

    const LIFO: &str = "[session]\nname = \"stack\"\n[structure]\nkind = \"lifo\"\n\
                        [dut]\ndefects = [\"early_full\"]\n[stimulus.weights]\npush_pop = 0\n";

    fn args(config: &str) -> CheckArgs {
        CheckArgs {
            config: config.to_string(),
            format: ReportFormat::Text,
        }
    }

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn valid_file_exits_zero() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stack.toml");
        fs::write(&path, LIFO).unwrap();
        assert_eq!(run(&args(path.to_str().unwrap()), &quiet()).unwrap(), 0);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rtlcheck.toml");
        fs::write(
            &path,
            "[session]\nname = \"x\"\n[structure]\nkind = \"fifo\"\n[stimulus.weights]\npop = 1\n",
        )
        .unwrap();
        assert!(run(&args(tmp.path().to_str().unwrap()), &quiet()).is_err());
    }

    #[test]
    fn text_summary_lists_mix_and_defects() {
        let config = load_config_from_str(LIFO).unwrap();
        let weights = resolve_weights(config.structure.kind(), &config.stimulus.weights).unwrap();
        let text = summary_text(&config, &weights);
        assert!(text.starts_with("stack (lifo): ok"));
        assert!(text.contains("  seed: 1"));
        assert!(text.contains("push "));
        assert!(!text.contains("push_pop"));
        assert!(text.contains("  defects: early_full"));
    }

    #[test]
    fn json_summary_fields() {
        let config = load_config_from_str(LIFO).unwrap();
        let weights = resolve_weights(config.structure.kind(), &config.stimulus.weights).unwrap();
        let value = summary_json(&config, &weights);
        assert_eq!(value["structure"], "lifo");
        assert_eq!(value["defects"][0], "early_full");
        assert!(value["weights"].get("push_pop").is_none());
        assert!(value["weights"]["pop"].as_u64().unwrap() > 0);
    }
}
