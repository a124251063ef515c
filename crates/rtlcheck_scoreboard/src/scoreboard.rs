//! The checking oracle.
//!
//! The scoreboard owns the reference model. Every transaction is replayed
//! against it in the order the design executed it, and the prediction is
//! compared field by field with what the design produced. Findings are
//! accumulated; nothing here aborts a run.

use crate::accumulator::ErrorAccumulator;
use crate::mismatch::{show, Field, Mismatch, MismatchKind};
use crate::report::Report;
use rtlcheck_common::{OpKind, Operation, SimTime, StatusField, StructureKind, Transaction};
use rtlcheck_model::ReferenceModel;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Replays transactions against a reference model and records disagreements.
pub struct Scoreboard {
    model: Box<dyn ReferenceModel>,
    errors: ErrorAccumulator,
    ops: BTreeMap<OpKind, u64>,
    checked: u64,
    next_seq: u64,
}

impl Scoreboard {
    /// Creates a scoreboard that takes ownership of `model`.
    pub fn new(model: Box<dyn ReferenceModel>) -> Self {
        Self {
            model,
            errors: ErrorAccumulator::new(),
            ops: BTreeMap::new(),
            checked: 0,
            next_seq: 0,
        }
    }

    /// Structure kind of the model.
    pub fn kind(&self) -> StructureKind {
        self.model.kind()
    }

    /// Findings so far.
    pub fn errors(&self) -> &ErrorAccumulator {
        &self.errors
    }

    /// Number of transactions checked.
    pub fn checked(&self) -> u64 {
        self.checked
    }

    /// Transactions checked per operation kind.
    pub fn ops(&self) -> &BTreeMap<OpKind, u64> {
        &self.ops
    }

    /// Sequence number the next transaction should carry.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Checks one transaction. Returns `true` if it agreed with the model.
    ///
    /// A transaction whose sequence number is not the next one expected is
    /// still replayed, but the gap is recorded as a finding.
    pub fn check(&mut self, txn: &Transaction) -> bool {
        let before = self.errors.total();
        if txn.seq != self.next_seq {
            tracing::warn!(expected = self.next_seq, got = txn.seq, "transaction out of order");
            let expected = self.next_seq;
            self.flag(
                txn,
                MismatchKind::ValueMismatch,
                Field::Sequence,
                expected.to_string(),
                txn.seq.to_string(),
            );
        }
        self.next_seq = txn.seq + 1;
        self.checked += 1;
        *self.ops.entry(txn.operation.kind()).or_default() += 1;

        let expected = self.model.apply(&txn.operation);
        let status = self.model.snapshot();
        let actual = &txn.response;

        match (expected.fault, actual.fault) {
            (true, true) => {
                self.errors.record_expected_fault();
                tracing::info!(seq = txn.seq, op = %txn.operation, "expected fault");
            }
            (true, false) => {
                self.flag(txn, MismatchKind::MissingFault, Field::Fault, "1", "0");
            }
            (false, true) => {
                self.flag(txn, MismatchKind::SpuriousFault, Field::Fault, "0", "1");
            }
            (false, false) => {
                self.compare(txn, Field::Value, expected.value, actual.value);
                if expected.values != actual.values {
                    self.flag(
                        txn,
                        MismatchKind::ValueMismatch,
                        Field::Values,
                        format!("{:?}", expected.values),
                        format!("{:?}", actual.values),
                    );
                }
                self.compare(txn, Field::Prev, expected.prev, actual.prev);
                self.compare(txn, Field::Next, expected.next, actual.next);
            }
        }

        let seen = &txn.status;
        self.compare_status(txn, StatusField::Length, status.length, seen.length);
        self.compare_status(txn, StatusField::Head, status.head, seen.head);
        self.compare_status(txn, StatusField::Tail, status.tail, seen.tail);
        self.compare_status(txn, StatusField::Full, status.full, seen.full);
        self.compare_status(txn, StatusField::Empty, status.empty, seen.empty);
        self.compare_status(
            txn,
            StatusField::CollisionCount,
            status.collision_count,
            seen.collision_count,
        );

        let clean = self.errors.total() == before;
        tracing::debug!(
            seq = txn.seq,
            op = %txn.operation,
            time = %txn.time,
            fault = actual.fault,
            clean,
            "checked"
        );
        clean
    }

    /// Records an operation that never completed. The model is not advanced.
    pub fn record_timeout(&mut self, op: &Operation, cycles: u32, time: SimTime) {
        let mismatch = Mismatch {
            seq: self.next_seq,
            time,
            op: op.to_string(),
            op_kind: op.kind(),
            kind: MismatchKind::Timeout,
            field: Field::Completion,
            expected: format!("done within {cycles} cycles"),
            actual: "none".to_string(),
        };
        tracing::error!(%mismatch, "timeout");
        self.errors.record(mismatch);
    }

    /// Returns the model to power-on state after a design reset. Findings
    /// are kept and numbering restarts.
    pub fn reset_model(&mut self) {
        self.model.reset();
        self.next_seq = 0;
    }

    /// Forgets all findings and counts and resets the model.
    pub fn reset(&mut self) {
        self.reset_model();
        self.errors.clear();
        self.ops.clear();
        self.checked = 0;
    }

    /// Summarizes the run so far.
    pub fn report(&self, name: &str) -> Report {
        Report::new(name, self.kind(), self.checked, &self.ops, &self.errors)
    }

    /// Compares an output that the model may leave as don't-care.
    fn compare<T: PartialEq + Display + Copy>(
        &mut self,
        txn: &Transaction,
        field: Field,
        expected: Option<T>,
        actual: Option<T>,
    ) {
        if let Some(want) = expected {
            if actual != Some(want) {
                self.flag(
                    txn,
                    MismatchKind::ValueMismatch,
                    field,
                    want.to_string(),
                    show(actual),
                );
            }
        }
    }

    /// Compares a status field the model predicts. A field the design does
    /// not expose is skipped; one it exposes but left unknown is a mismatch.
    fn compare_status<T: PartialEq + Display + Copy>(
        &mut self,
        txn: &Transaction,
        which: StatusField,
        expected: Option<T>,
        actual: Option<T>,
    ) {
        let Some(want) = expected else {
            return;
        };
        let differs = match actual {
            Some(got) => got != want,
            None => txn.status.is_unknown(which),
        };
        if differs {
            self.flag(
                txn,
                MismatchKind::ValueMismatch,
                status_field(which),
                want.to_string(),
                show(actual),
            );
        }
    }

    fn flag(
        &mut self,
        txn: &Transaction,
        kind: MismatchKind,
        field: Field,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        let mismatch = Mismatch {
            seq: txn.seq,
            time: txn.time,
            op: txn.operation.to_string(),
            op_kind: txn.operation.kind(),
            kind,
            field,
            expected: expected.into(),
            actual: actual.into(),
        };
        tracing::error!(%mismatch, "mismatch");
        self.errors.record(mismatch);
    }
}

fn status_field(which: StatusField) -> Field {
    match which {
        StatusField::Length => Field::Length,
        StatusField::Head => Field::Head,
        StatusField::Tail => Field::Tail,
        StatusField::Full => Field::Full,
        StatusField::Empty => Field::Empty,
        StatusField::CollisionCount => Field::CollisionCount,
    }
}
