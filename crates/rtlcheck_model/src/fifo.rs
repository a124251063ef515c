//! Bounded FIFO model.
//!
//! `Enqueue` faults when full and `Dequeue` faults when empty; neither
//! mutates on fault.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::FifoParams;
use std::collections::VecDeque;

/// Reference model of a bounded queue.
#[derive(Clone, Debug)]
pub struct FifoModel {
    depth: u64,
    data_mask: u64,
    entries: VecDeque<u64>,
}

impl FifoModel {
    /// Creates an empty queue.
    pub fn new(params: &FifoParams) -> Self {
        Self {
            depth: params.depth,
            data_mask: value_mask(params.data_width),
            entries: VecDeque::new(),
        }
    }

    /// Stored values, oldest first.
    pub fn entries(&self) -> Vec<u64> {
        self.entries.iter().copied().collect()
    }

    fn is_full(&self) -> bool {
        self.entries.len() as u64 >= self.depth
    }
}

impl ReferenceModel for FifoModel {
    fn kind(&self) -> StructureKind {
        StructureKind::Fifo
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::Enqueue { value } => {
                if self.is_full() {
                    return Response::fault();
                }
                self.entries.push_back(value & self.data_mask);
                Response::ok()
            }
            Operation::Dequeue => self
                .entries
                .pop_front()
                .map_or_else(Response::fault, Response::value),
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::Fifo, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status {
            length: Some(self.entries.len() as u64),
            full: Some(self.is_full()),
            empty: Some(self.entries.is_empty()),
            ..Status::default()
        }
    }

    fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overfill_then_drain() {
        let mut m = FifoModel::new(&FifoParams::default());
        let faults: Vec<bool> = (0..15)
            .map(|v| m.apply(&Operation::Enqueue { value: v }).fault)
            .collect();
        assert_eq!(faults.iter().filter(|f| **f).count(), 3);
        assert!(faults[12..].iter().all(|f| *f));
        assert_eq!(m.snapshot().full, Some(true));
        assert_eq!(m.snapshot().length, Some(12));

        let reads: Vec<Response> = (0..15).map(|_| m.apply(&Operation::Dequeue)).collect();
        let values: Vec<u64> = reads.iter().filter_map(|r| r.value).collect();
        assert_eq!(values, (0..12).collect::<Vec<_>>());
        assert!(reads[12..].iter().all(|r| r.fault && r.value.is_none()));
        assert_eq!(m.snapshot().empty, Some(true));
    }

    #[test]
    fn values_are_masked() {
        let mut m = FifoModel::new(&FifoParams::default());
        m.apply(&Operation::Enqueue { value: 0x1234 });
        assert_eq!(m.entries(), vec![0x34]);
    }

    #[test]
    fn reset_empties() {
        let mut m = FifoModel::new(&FifoParams::default());
        m.apply(&Operation::Enqueue { value: 1 });
        m.reset();
        assert_eq!(m.snapshot().empty, Some(true));
    }
}
