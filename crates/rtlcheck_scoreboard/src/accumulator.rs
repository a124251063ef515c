//! Accumulation of checker findings across a run.

use crate::mismatch::{Mismatch, MismatchKind};
use rtlcheck_common::OpKind;
use std::collections::BTreeMap;

/// Collects every finding of a run without stopping at the first one.
///
/// Counts are kept per category and per operation kind so the report can
/// be produced without rescanning the list.
#[derive(Clone, Debug, Default)]
pub struct ErrorAccumulator {
    mismatches: Vec<Mismatch>,
    by_kind: BTreeMap<MismatchKind, u64>,
    by_op: BTreeMap<OpKind, u64>,
    expected_faults: u64,
}

impl ErrorAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn record(&mut self, mismatch: Mismatch) {
        *self.by_kind.entry(mismatch.kind).or_default() += 1;
        *self.by_op.entry(mismatch.op_kind).or_default() += 1;
        self.mismatches.push(mismatch);
    }

    /// Counts a fault the model predicted and the design reported.
    pub fn record_expected_fault(&mut self) {
        self.expected_faults += 1;
    }

    /// Number of findings in `kind`.
    pub fn count(&self, kind: MismatchKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of findings.
    pub fn total(&self) -> u64 {
        self.mismatches.len() as u64
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of correctly reported faults.
    pub fn expected_faults(&self) -> u64 {
        self.expected_faults
    }

    /// All findings, in the order they were recorded.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Findings per category.
    pub fn by_kind(&self) -> &BTreeMap<MismatchKind, u64> {
        &self.by_kind
    }

    /// Findings per operation kind.
    pub fn by_op(&self) -> &BTreeMap<OpKind, u64> {
        &self.by_op
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
