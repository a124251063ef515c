//! Conformance test helpers for rtlcheck.
//!
//! Builds session configurations from short TOML fragments and runs scripted
//! or random operation sequences through a full session (behavioural design,
//! agents, scoreboard), returning structured results for assertion in
//! integration tests.

#![warn(missing_docs)]

use rtlcheck_common::{OpKind, Operation, Response, Transaction};
use rtlcheck_config::{Defect, SessionConfig};
use rtlcheck_scoreboard::Report;
use rtlcheck_session::{Session, SessionError};

/// Result of running a scripted sequence through a session.
pub struct RunResult {
    /// The final report.
    pub report: Report,
    /// Every checked transaction, in design order.
    pub transactions: Vec<Transaction>,
    /// The error that ended the run early, if any.
    pub error: Option<SessionError>,
}

impl RunResult {
    /// Responses of the transactions of one operation kind.
    pub fn responses(&self, kind: OpKind) -> Vec<&Response> {
        self.transactions
            .iter()
            .filter(|t| t.operation.kind() == kind)
            .map(|t| &t.response)
            .collect()
    }

    /// Values returned by successful transactions of one operation kind.
    pub fn values(&self, kind: OpKind) -> Vec<u64> {
        self.responses(kind)
            .into_iter()
            .filter(|r| !r.fault)
            .filter_map(|r| r.value)
            .collect()
    }

    /// Fault flags of the transactions of one operation kind.
    pub fn faults(&self, kind: OpKind) -> Vec<bool> {
        self.responses(kind).into_iter().map(|r| r.fault).collect()
    }
}

/// Creates a session configuration.
///
/// `structure` is the body of the `[structure]` table, e.g.
/// `kind = "fifo"\ndepth = 12`.
pub fn make_config(structure: &str) -> SessionConfig {
    make_config_with(structure, None, &[])
}

/// Creates a session configuration with a seed and injected defects.
pub fn make_config_with(structure: &str, seed: Option<u64>, defects: &[Defect]) -> SessionConfig {
    let seed_line = seed.map(|s| format!("seed = {s}\n")).unwrap_or_default();
    let defect_list: Vec<String> = defects.iter().map(|d| format!("\"{d}\"")).collect();
    let toml_str = format!(
        r#"
[session]
name = "conformance"
timeout_cycles = 50
{seed_line}
[structure]
{structure}

[dut]
defects = [{defects}]
"#,
        defects = defect_list.join(", "),
    );
    rtlcheck_config::load_config_from_str(&toml_str).unwrap()
}

/// Runs `ops` in program order and collects the outcome.
pub fn run_script(config: &SessionConfig, ops: &[Operation]) -> RunResult {
    let mut session = Session::new(config).unwrap();
    let error = session.run(ops).err();
    let report = session.finish().unwrap();
    RunResult {
        report,
        transactions: session.transactions().to_vec(),
        error,
    }
}

/// Runs `ops` with every interface working at once.
pub fn run_concurrent(config: &SessionConfig, ops: &[Operation]) -> RunResult {
    let mut session = Session::new(config).unwrap();
    let error = session.run_concurrent(ops).err();
    let report = session.finish().unwrap();
    RunResult {
        report,
        transactions: session.transactions().to_vec(),
        error,
    }
}

/// Runs `count` random operations and returns the report.
pub fn run_random(config: &SessionConfig, count: usize) -> Report {
    rtlcheck_session::verify(config, count).unwrap()
}

/// One `[structure]` body per structure kind, at default parameters.
pub fn every_structure() -> Vec<&'static str> {
    vec![
        "kind = \"singly_linked_list\"",
        "kind = \"doubly_linked_list\"",
        "kind = \"fifo\"",
        "kind = \"lifo\"",
        "kind = \"hash_table\"",
        "kind = \"list\"",
        "kind = \"table\"",
        "kind = \"dual_edge_ff\"",
    ]
}
