//! Multi-port register table model.
//!
//! A [`TableAccess`](Operation::TableAccess) is one clock cycle. Reads are
//! registered and sample the table before the cycle's writes land. When
//! several write lanes target the same slot, the highest lane wins. Any index
//! at or beyond `table_size` faults the whole access without writing.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::TableParams;

/// Reference model of a register table.
#[derive(Clone, Debug)]
pub struct TableModel {
    data_mask: u64,
    reset_value: u64,
    slots: Vec<u64>,
}

impl TableModel {
    /// Creates a table with every slot at the reset value.
    pub fn new(params: &TableParams) -> Self {
        let data_mask = value_mask(params.data_width);
        let reset_value = params.reset_value & data_mask;
        Self {
            data_mask,
            reset_value,
            slots: vec![reset_value; params.table_size as usize],
        }
    }

    /// Current value of a slot.
    pub fn slot(&self, index: usize) -> Option<u64> {
        self.slots.get(index).copied()
    }

    fn in_range(&self, index: u64) -> bool {
        index < self.slots.len() as u64
    }
}

impl ReferenceModel for TableModel {
    fn kind(&self) -> StructureKind {
        StructureKind::Table
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::TableAccess { writes, reads } => {
                let indices_ok = reads.iter().all(|i| self.in_range(*i))
                    && writes.iter().all(|w| self.in_range(w.index));
                if !indices_ok {
                    return Response::fault();
                }
                let values = reads.iter().map(|i| self.slots[*i as usize]).collect();
                for w in writes {
                    self.slots[w.index as usize] = w.value & self.data_mask;
                }
                Response::values(values)
            }
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::Table, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status::default()
    }

    fn reset(&mut self) {
        let value = self.reset_value;
        self.slots.iter_mut().for_each(|s| *s = value);
    }
}
