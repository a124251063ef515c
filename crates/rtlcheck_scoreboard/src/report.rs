//! End-of-run summary and its renderers.

use crate::accumulator::ErrorAccumulator;
use crate::mismatch::{Mismatch, MismatchKind};
use rtlcheck_common::{OpKind, StructureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No findings in any category.
    Pass,
    /// At least one finding.
    Fail,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Summary of a verification run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Session name.
    pub name: String,
    /// Structure verified.
    pub structure: StructureKind,
    /// Transactions checked.
    pub transactions: u64,
    /// Transactions checked per operation kind.
    pub ops: BTreeMap<OpKind, u64>,
    /// Faults the design reported correctly.
    pub expected_faults: u64,
    /// Findings per category.
    pub mismatches_by_kind: BTreeMap<MismatchKind, u64>,
    /// Findings per operation kind.
    pub mismatches_by_op: BTreeMap<OpKind, u64>,
    /// Every finding, in detection order.
    pub mismatches: Vec<Mismatch>,
    /// Overall outcome.
    pub verdict: Verdict,
}

impl Report {
    /// Builds a report from accumulated counts.
    pub fn new(
        name: &str,
        structure: StructureKind,
        transactions: u64,
        ops: &BTreeMap<OpKind, u64>,
        errors: &ErrorAccumulator,
    ) -> Self {
        let verdict = if errors.is_clean() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        Self {
            name: name.to_string(),
            structure,
            transactions,
            ops: ops.clone(),
            expected_faults: errors.expected_faults(),
            mismatches_by_kind: errors.by_kind().clone(),
            mismatches_by_op: errors.by_op().clone(),
            mismatches: errors.mismatches().to_vec(),
            verdict,
        }
    }

    /// Number of findings in `kind`.
    pub fn count(&self, kind: MismatchKind) -> u64 {
        self.mismatches_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Returns `true` if the run passed.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Process exit code: 0 on pass, 1 on fail.
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Trait for rendering a report into an output string.
pub trait ReportRenderer {
    /// Renders the report.
    fn render(&self, report: &Report) -> String;
}

/// Renders a report for a terminal.
///
/// Produces output like:
/// ```text
/// fifo_smoke (fifo): FAIL
///   transactions: 30 (enqueue 15, dequeue 15)
///   expected faults: 6
///   mismatches: 1 (missing_fault 1)
///   error: #12 at 245 ns enqueue(value=3): missing_fault on fault (expected 1, got 0)
/// ```
pub struct TextRenderer {
    /// Maximum number of individual findings listed.
    pub max_listed: usize,
}

impl TextRenderer {
    /// Creates a text renderer listing at most `max_listed` findings.
    pub fn new(max_listed: usize) -> Self {
        Self { max_listed }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} ({}): {}\n",
            report.name, report.structure, report.verdict
        ));

        out.push_str(&format!("  transactions: {}", report.transactions));
        if !report.ops.is_empty() {
            out.push_str(&format!(" ({})", join_counts(&report.ops)));
        }
        out.push('\n');
        out.push_str(&format!("  expected faults: {}\n", report.expected_faults));

        out.push_str(&format!("  mismatches: {}", report.mismatches.len()));
        if !report.mismatches_by_kind.is_empty() {
            out.push_str(&format!(" ({})", join_counts(&report.mismatches_by_kind)));
        }
        out.push('\n');
        if !report.mismatches_by_op.is_empty() {
            out.push_str(&format!(
                "  by operation: {}\n",
                join_counts(&report.mismatches_by_op)
            ));
        }

        for mismatch in report.mismatches.iter().take(self.max_listed) {
            out.push_str(&format!("  error: {mismatch}\n"));
        }
        let hidden = report.mismatches.len().saturating_sub(self.max_listed);
        if hidden > 0 {
            out.push_str(&format!("  ... and {hidden} more\n"));
        }
        out
    }
}

/// Renders a report as JSON.
#[derive(Default)]
pub struct JsonRenderer {
    /// Whether to indent the output.
    pub pretty: bool,
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &Report) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

fn join_counts<K: fmt::Display>(counts: &BTreeMap<K, u64>) -> String {
    counts
        .iter()
        .map(|(k, n)| format!("{k} {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mismatch::Field;
    use rtlcheck_common::SimTime;

    fn failing() -> Report {
        let mut errors = ErrorAccumulator::new();
        errors.record_expected_fault();
        errors.record(Mismatch {
            seq: 12,
            time: SimTime::from_ns(245),
            op: "enqueue(value=3)".to_string(),
            op_kind: OpKind::Enqueue,
            kind: MismatchKind::MissingFault,
            field: Field::Fault,
            expected: "1".to_string(),
            actual: "0".to_string(),
        });
        let ops = BTreeMap::from([(OpKind::Enqueue, 15), (OpKind::Dequeue, 15)]);
        Report::new("fifo_smoke", StructureKind::Fifo, 30, &ops, &errors)
    }

    #[test]
    fn verdict_follows_findings() {
        let clean = Report::new(
            "ok",
            StructureKind::Lifo,
            0,
            &BTreeMap::new(),
            &ErrorAccumulator::new(),
        );
        assert!(clean.passed());
        assert_eq!(clean.exit_code(), 0);
        let bad = failing();
        assert_eq!(bad.verdict, Verdict::Fail);
        assert_eq!(bad.exit_code(), 1);
        assert_eq!(bad.count(MismatchKind::MissingFault), 1);
        assert_eq!(bad.count(MismatchKind::Timeout), 0);
    }

    #[test]
    fn render_text() {
        let out = TextRenderer::default().render(&failing());
        assert!(out.starts_with("fifo_smoke (fifo): FAIL\n"));
        assert!(out.contains("transactions: 30 (enqueue 15, dequeue 15)"));
        assert!(out.contains("expected faults: 1"));
        assert!(out.contains("mismatches: 1 (missing_fault 1)"));
        assert!(out.contains(
            "error: #12 at 245 ns enqueue(value=3): missing_fault on fault (expected 1, got 0)"
        ));
    }

    #[test]
    fn render_text_truncates() {
        let out = TextRenderer::new(0).render(&failing());
        assert!(!out.contains("error:"));
        assert!(out.contains("... and 1 more"));
    }

    #[test]
    fn render_json_round_trips() {
        let report = failing();
        let json = JsonRenderer { pretty: true }.render(&report);
        assert!(json.contains("\"verdict\": \"fail\""));
        assert!(json.contains("\"missing_fault\": 1"));
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
