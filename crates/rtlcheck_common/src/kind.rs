//! The family of data-structure designs that can be verified.

use crate::op::OpKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A data-structure design kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Singly-linked list with address-addressed nodes.
    SinglyLinkedList,
    /// Doubly-linked list with address-addressed nodes.
    DoublyLinkedList,
    /// Bounded first-in first-out queue.
    Fifo,
    /// Bounded last-in first-out stack.
    Lifo,
    /// Hash table of fixed-capacity buckets.
    HashTable,
    /// Indexable list with sort, sum, and find.
    List,
    /// Multi-port register table.
    Table,
    /// Flip-flop latching on both clock edges.
    DualEdgeFf,
}

const LINKED_LIST_OPS: &[OpKind] = &[
    OpKind::Read,
    OpKind::InsertAtAddr,
    OpKind::InsertAtIndex,
    OpKind::DeleteByValue,
    OpKind::DeleteAtAddr,
    OpKind::DeleteAtIndex,
    OpKind::Idle,
];
const FIFO_OPS: &[OpKind] = &[OpKind::Enqueue, OpKind::Dequeue, OpKind::Idle];
const LIFO_OPS: &[OpKind] = &[OpKind::Push, OpKind::Pop, OpKind::PushPop, OpKind::Idle];
const HASH_OPS: &[OpKind] = &[
    OpKind::Insert,
    OpKind::DeleteKey,
    OpKind::Search,
    OpKind::Idle,
];
const LIST_OPS: &[OpKind] = &[
    OpKind::Read,
    OpKind::InsertAtIndex,
    OpKind::DeleteAtIndex,
    OpKind::FindFirst,
    OpKind::FindAll,
    OpKind::Sum,
    OpKind::SortAscending,
    OpKind::SortDescending,
    OpKind::Idle,
];
const TABLE_OPS: &[OpKind] = &[
    OpKind::WriteLanes,
    OpKind::ReadLanes,
    OpKind::ReadWriteLanes,
    OpKind::Idle,
];
const DUAL_EDGE_OPS: &[OpKind] = &[OpKind::EdgeLatch, OpKind::Idle];

impl StructureKind {
    /// Every kind, in declaration order.
    pub const ALL: [StructureKind; 8] = [
        StructureKind::SinglyLinkedList,
        StructureKind::DoublyLinkedList,
        StructureKind::Fifo,
        StructureKind::Lifo,
        StructureKind::HashTable,
        StructureKind::List,
        StructureKind::Table,
        StructureKind::DualEdgeFf,
    ];

    /// Returns the operation kinds this structure recognizes.
    pub fn supported_ops(self) -> &'static [OpKind] {
        match self {
            StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList => LINKED_LIST_OPS,
            StructureKind::Fifo => FIFO_OPS,
            StructureKind::Lifo => LIFO_OPS,
            StructureKind::HashTable => HASH_OPS,
            StructureKind::List => LIST_OPS,
            StructureKind::Table => TABLE_OPS,
            StructureKind::DualEdgeFf => DUAL_EDGE_OPS,
        }
    }

    /// Returns true if `op` is part of this structure's operation set.
    pub fn supports(self, op: OpKind) -> bool {
        self.supported_ops().contains(&op)
    }

    /// The snake_case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            StructureKind::SinglyLinkedList => "singly_linked_list",
            StructureKind::DoublyLinkedList => "doubly_linked_list",
            StructureKind::Fifo => "fifo",
            StructureKind::Lifo => "lifo",
            StructureKind::HashTable => "hash_table",
            StructureKind::List => "list",
            StructureKind::Table => "table",
            StructureKind::DualEdgeFf => "dual_edge_ff",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_supports_idle() {
        for kind in StructureKind::ALL {
            assert!(kind.supports(OpKind::Idle), "{kind}");
        }
    }

    #[test]
    fn subsets_are_disjoint_where_expected() {
        assert!(StructureKind::Fifo.supports(OpKind::Enqueue));
        assert!(!StructureKind::Fifo.supports(OpKind::Push));
        assert!(StructureKind::Lifo.supports(OpKind::PushPop));
        assert!(!StructureKind::List.supports(OpKind::InsertAtAddr));
        assert!(StructureKind::DoublyLinkedList.supports(OpKind::DeleteAtAddr));
    }

    #[test]
    fn serde_name_matches_display() {
        for kind in StructureKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
