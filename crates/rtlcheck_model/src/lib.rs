//! Golden reference models for the verified data structures.
//!
//! Every model implements [`ReferenceModel`]: `apply` mutates the model only
//! when the operation is legal and returns what the hardware is expected to
//! report, and `snapshot` returns the auxiliary status the scoreboard checks
//! after every transaction. Illegal operations never panic or return `Err`;
//! they produce a faulting [`Response`] with don't-care outputs, mirroring
//! the hardware fault flag.
//!
//! Each model's module documents its decision table.

#![warn(missing_docs)]

pub mod dual_edge;
pub mod fifo;
pub mod hash_table;
pub mod lifo;
pub mod linked_list;
pub mod list;
pub mod table;

pub use dual_edge::DualEdgeModel;
pub use fifo::FifoModel;
pub use hash_table::HashTableModel;
pub use lifo::LifoModel;
pub use linked_list::LinkedListModel;
pub use list::ListModel;
pub use table::TableModel;

use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::StructureConfig;

/// A software model of one data-structure design.
pub trait ReferenceModel {
    /// The structure kind modelled.
    fn kind(&self) -> StructureKind;

    /// Applies an operation and returns the expected response.
    fn apply(&mut self, op: &Operation) -> Response;

    /// Returns the current auxiliary status.
    fn snapshot(&self) -> Status;

    /// Returns the model to its power-on state.
    fn reset(&mut self);
}

/// Builds the reference model for a configured structure.
pub fn build_model(config: &StructureConfig) -> Box<dyn ReferenceModel> {
    match config {
        StructureConfig::SinglyLinkedList(p) => {
            Box::new(LinkedListModel::new(StructureKind::SinglyLinkedList, p))
        }
        StructureConfig::DoublyLinkedList(p) => {
            Box::new(LinkedListModel::new(StructureKind::DoublyLinkedList, p))
        }
        StructureConfig::Fifo(p) => Box::new(FifoModel::new(p)),
        StructureConfig::Lifo(p) => Box::new(LifoModel::new(p)),
        StructureConfig::HashTable(p) => Box::new(HashTableModel::new(p)),
        StructureConfig::List(p) => Box::new(ListModel::new(p)),
        StructureConfig::Table(p) => Box::new(TableModel::new(p)),
        StructureConfig::DualEdgeFf(p) => Box::new(DualEdgeModel::new(p)),
    }
}

/// Mask covering a value of `width` bits, at most 64.
pub(crate) fn value_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Response for an operation outside the structure's operation set.
pub(crate) fn unsupported(kind: StructureKind, op: &Operation) -> Response {
    tracing::warn!(%kind, %op, "operation not supported by structure, expecting fault");
    Response::fault()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlcheck_config::{FifoParams, LinkedListParams, TableParams};

    #[test]
    fn build_model_matches_kind() {
        let cases = [
            (
                StructureConfig::SinglyLinkedList(LinkedListParams::default()),
                StructureKind::SinglyLinkedList,
            ),
            (
                StructureConfig::Fifo(FifoParams::default()),
                StructureKind::Fifo,
            ),
            (
                StructureConfig::Table(TableParams::default()),
                StructureKind::Table,
            ),
        ];
        for (config, kind) in cases {
            assert_eq!(build_model(&config).kind(), kind);
        }
    }

    #[test]
    fn foreign_operation_faults_without_mutation() {
        let mut model = build_model(&StructureConfig::Fifo(FifoParams::default()));
        let before = model.snapshot();
        assert!(model.apply(&Operation::Push { value: 1 }).fault);
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn idle_is_a_no_op_everywhere() {
        let mut model = build_model(&StructureConfig::Fifo(FifoParams::default()));
        model.apply(&Operation::Enqueue { value: 4 });
        let before = model.snapshot();
        assert_eq!(model.apply(&Operation::Idle), Response::ok());
        assert_eq!(model.snapshot(), before);
    }

    #[test]
    fn masks() {
        assert_eq!(value_mask(8), 0xff);
        assert_eq!(value_mask(64), u64::MAX);
    }
}
