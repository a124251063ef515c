//! Checker findings: what disagreed, where, and how.

use rtlcheck_common::{OpKind, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a checker finding.
///
/// Expected faults are not findings; they are counted separately.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// The design did not flag an operation the model rejects.
    MissingFault,
    /// The design flagged an operation the model accepts.
    SpuriousFault,
    /// An output or status field differs while both agree on the fault flag.
    ValueMismatch,
    /// The design never completed an operation.
    Timeout,
}

impl MismatchKind {
    /// Every kind, in report order.
    pub const ALL: [MismatchKind; 4] = [
        MismatchKind::MissingFault,
        MismatchKind::SpuriousFault,
        MismatchKind::ValueMismatch,
        MismatchKind::Timeout,
    ];

    /// The snake_case name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            MismatchKind::MissingFault => "missing_fault",
            MismatchKind::SpuriousFault => "spurious_fault",
            MismatchKind::ValueMismatch => "value_mismatch",
            MismatchKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The compared field a finding refers to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Field {
    Fault,
    Value,
    Values,
    Prev,
    Next,
    Length,
    Head,
    Tail,
    Full,
    Empty,
    CollisionCount,
    Completion,
    Sequence,
}

impl Field {
    /// The snake_case name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Field::Fault => "fault",
            Field::Value => "value",
            Field::Values => "values",
            Field::Prev => "prev",
            Field::Next => "next",
            Field::Length => "length",
            Field::Head => "head",
            Field::Tail => "tail",
            Field::Full => "full",
            Field::Empty => "empty",
            Field::CollisionCount => "collision_count",
            Field::Completion => "completion",
            Field::Sequence => "sequence",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One disagreement between the design and the reference model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Sequence number of the offending transaction.
    pub seq: u64,
    /// Time the design sampled the operation.
    pub time: SimTime,
    /// The operation, rendered.
    pub op: String,
    /// Kind of the operation, for grouping.
    pub op_kind: OpKind,
    /// Category.
    pub kind: MismatchKind,
    /// Field compared.
    pub field: Field,
    /// What the model predicted.
    pub expected: String,
    /// What the design produced.
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} at {} {}: {} on {} (expected {}, got {})",
            self.seq, self.time, self.op, self.kind, self.field, self.expected, self.actual
        )
    }
}

/// Renders an optional field, `x` when the design left it undriven.
pub(crate) fn show<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "x".to_string(), |v| v.to_string())
}
