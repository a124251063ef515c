//! Symbolic operations applied to a data-structure design.
//!
//! [`Operation`] is the tagged variant carried through encoding, driving,
//! monitoring, and checking. [`OpKind`] is its fieldless discriminant, used
//! for weights, opcode tables, and report grouping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Low-to-high transition.
    Rising,
    /// High-to-low transition.
    Falling,
}

impl Edge {
    /// Returns the other edge.
    pub fn opposite(self) -> Self {
        match self {
            Edge::Rising => Edge::Falling,
            Edge::Falling => Edge::Rising,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Rising => write!(f, "posedge"),
            Edge::Falling => write!(f, "negedge"),
        }
    }
}

/// One write lane of a multi-port register table access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneWrite {
    /// Target slot.
    pub index: u64,
    /// Value written.
    pub value: u64,
}

/// An operation with concrete field values.
///
/// Each structure kind recognizes only a subset; see
/// [`StructureKind::supports`](crate::StructureKind::supports).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Read the node at an address (linked lists) or the element at an index (list).
    Read {
        /// Address or index to read.
        target: u64,
    },
    /// Insert a value before the node at `addr`.
    InsertAtAddr {
        /// Address of the node to insert before.
        addr: u64,
        /// Value stored in the new node.
        value: u64,
    },
    /// Insert a value at a position.
    InsertAtIndex {
        /// Position of the new element.
        index: u64,
        /// Value stored.
        value: u64,
    },
    /// Remove the first element holding `value`.
    DeleteByValue {
        /// Value to search for.
        value: u64,
    },
    /// Remove the node at an address.
    DeleteAtAddr {
        /// Address of the node.
        addr: u64,
    },
    /// Remove the element at a position.
    DeleteAtIndex {
        /// Position of the element.
        index: u64,
    },
    /// Push onto a stack.
    Push {
        /// Value pushed.
        value: u64,
    },
    /// Pop from a stack.
    Pop,
    /// Push and pop in the same cycle.
    PushPop {
        /// Value pushed, which is also the value read back.
        value: u64,
    },
    /// Write into a queue.
    Enqueue {
        /// Value written.
        value: u64,
    },
    /// Read from a queue.
    Dequeue,
    /// Insert or update a key.
    Insert {
        /// Key.
        key: u64,
        /// Value associated with the key.
        value: u64,
    },
    /// Remove a key.
    DeleteKey {
        /// Key.
        key: u64,
    },
    /// Look up a key.
    Search {
        /// Key.
        key: u64,
    },
    /// Sum every element.
    Sum,
    /// Sort elements in non-decreasing order.
    SortAscending,
    /// Sort elements in non-increasing order.
    SortDescending,
    /// Return the index of the first element equal to `value`.
    FindFirst {
        /// Value to search for.
        value: u64,
    },
    /// Return every index holding `value`.
    FindAll {
        /// Value to search for.
        value: u64,
    },
    /// One cycle of a multi-port register table: lane writes and lane reads together.
    TableAccess {
        /// Write lanes, lane 0 first.
        writes: Vec<LaneWrite>,
        /// Read indices, lane 0 first.
        reads: Vec<u64>,
    },
    /// Latch `value` into the bits selected by `enable` on one clock edge.
    EdgeLatch {
        /// Edge on which the latch happens.
        edge: Edge,
        /// Data presented to the flip-flop.
        value: u64,
        /// Per-bit latch enable.
        enable: u64,
    },
    /// No operation.
    Idle,
}

impl Operation {
    /// A table access with writes only.
    pub fn write_lanes(writes: Vec<LaneWrite>) -> Self {
        Operation::TableAccess {
            writes,
            reads: Vec::new(),
        }
    }

    /// A table access with reads only.
    pub fn read_lanes(reads: Vec<u64>) -> Self {
        Operation::TableAccess {
            writes: Vec::new(),
            reads,
        }
    }

    /// Returns the fieldless kind of this operation.
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Read { .. } => OpKind::Read,
            Operation::InsertAtAddr { .. } => OpKind::InsertAtAddr,
            Operation::InsertAtIndex { .. } => OpKind::InsertAtIndex,
            Operation::DeleteByValue { .. } => OpKind::DeleteByValue,
            Operation::DeleteAtAddr { .. } => OpKind::DeleteAtAddr,
            Operation::DeleteAtIndex { .. } => OpKind::DeleteAtIndex,
            Operation::Push { .. } => OpKind::Push,
            Operation::Pop => OpKind::Pop,
            Operation::PushPop { .. } => OpKind::PushPop,
            Operation::Enqueue { .. } => OpKind::Enqueue,
            Operation::Dequeue => OpKind::Dequeue,
            Operation::Insert { .. } => OpKind::Insert,
            Operation::DeleteKey { .. } => OpKind::DeleteKey,
            Operation::Search { .. } => OpKind::Search,
            Operation::Sum => OpKind::Sum,
            Operation::SortAscending => OpKind::SortAscending,
            Operation::SortDescending => OpKind::SortDescending,
            Operation::FindFirst { .. } => OpKind::FindFirst,
            Operation::FindAll { .. } => OpKind::FindAll,
            Operation::TableAccess { writes, reads } => match (writes.is_empty(), reads.is_empty())
            {
                (false, true) => OpKind::WriteLanes,
                (true, false) => OpKind::ReadLanes,
                _ => OpKind::ReadWriteLanes,
            },
            Operation::EdgeLatch { .. } => OpKind::EdgeLatch,
            Operation::Idle => OpKind::Idle,
        }
    }

    /// Returns true for operations that never touch the bus.
    pub fn is_idle(&self) -> bool {
        matches!(self, Operation::Idle)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind();
        match self {
            Operation::Read { target } => write!(f, "{name}(target={target})"),
            Operation::InsertAtAddr { addr, value } => {
                write!(f, "{name}(addr={addr}, value={value})")
            }
            Operation::InsertAtIndex { index, value } => {
                write!(f, "{name}(index={index}, value={value})")
            }
            Operation::DeleteAtAddr { addr } => write!(f, "{name}(addr={addr})"),
            Operation::DeleteAtIndex { index } => write!(f, "{name}(index={index})"),
            Operation::DeleteByValue { value }
            | Operation::Push { value }
            | Operation::PushPop { value }
            | Operation::Enqueue { value }
            | Operation::FindFirst { value }
            | Operation::FindAll { value } => write!(f, "{name}(value={value})"),
            Operation::Insert { key, value } => write!(f, "{name}(key={key}, value={value})"),
            Operation::DeleteKey { key } | Operation::Search { key } => {
                write!(f, "{name}(key={key})")
            }
            Operation::TableAccess { writes, reads } => {
                write!(f, "{name}(")?;
                for (lane, w) in writes.iter().enumerate() {
                    write!(f, "w{lane}[{}]={}, ", w.index, w.value)?;
                }
                write!(f, "reads={reads:?})")
            }
            Operation::EdgeLatch {
                edge,
                value,
                enable,
            } => write!(f, "{name}({edge}, value={value:#x}, enable={enable:#x})"),
            Operation::Pop
            | Operation::Dequeue
            | Operation::Sum
            | Operation::SortAscending
            | Operation::SortDescending
            | Operation::Idle => write!(f, "{name}"),
        }
    }
}

/// The discriminant of an [`Operation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum OpKind {
    Read,
    InsertAtAddr,
    InsertAtIndex,
    DeleteByValue,
    DeleteAtAddr,
    DeleteAtIndex,
    Push,
    Pop,
    PushPop,
    Enqueue,
    Dequeue,
    Insert,
    DeleteKey,
    Search,
    Sum,
    SortAscending,
    SortDescending,
    FindFirst,
    FindAll,
    WriteLanes,
    ReadLanes,
    ReadWriteLanes,
    EdgeLatch,
    Idle,
}

impl OpKind {
    /// Every kind, in declaration order.
    pub const ALL: [OpKind; 24] = [
        OpKind::Read,
        OpKind::InsertAtAddr,
        OpKind::InsertAtIndex,
        OpKind::DeleteByValue,
        OpKind::DeleteAtAddr,
        OpKind::DeleteAtIndex,
        OpKind::Push,
        OpKind::Pop,
        OpKind::PushPop,
        OpKind::Enqueue,
        OpKind::Dequeue,
        OpKind::Insert,
        OpKind::DeleteKey,
        OpKind::Search,
        OpKind::Sum,
        OpKind::SortAscending,
        OpKind::SortDescending,
        OpKind::FindFirst,
        OpKind::FindAll,
        OpKind::WriteLanes,
        OpKind::ReadLanes,
        OpKind::ReadWriteLanes,
        OpKind::EdgeLatch,
        OpKind::Idle,
    ];

    /// The snake_case name used in configuration files and reports.
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Read => "read",
            OpKind::InsertAtAddr => "insert_at_addr",
            OpKind::InsertAtIndex => "insert_at_index",
            OpKind::DeleteByValue => "delete_by_value",
            OpKind::DeleteAtAddr => "delete_at_addr",
            OpKind::DeleteAtIndex => "delete_at_index",
            OpKind::Push => "push",
            OpKind::Pop => "pop",
            OpKind::PushPop => "push_pop",
            OpKind::Enqueue => "enqueue",
            OpKind::Dequeue => "dequeue",
            OpKind::Insert => "insert",
            OpKind::DeleteKey => "delete_key",
            OpKind::Search => "search",
            OpKind::Sum => "sum",
            OpKind::SortAscending => "sort_ascending",
            OpKind::SortDescending => "sort_descending",
            OpKind::FindFirst => "find_first",
            OpKind::FindAll => "find_all",
            OpKind::WriteLanes => "write_lanes",
            OpKind::ReadLanes => "read_lanes",
            OpKind::ReadWriteLanes => "read_write_lanes",
            OpKind::EdgeLatch => "edge_latch",
            OpKind::Idle => "idle",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown operation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation '{input}'")]
pub struct ParseOpKindError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for OpKind {
    type Err = ParseOpKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OpKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParseOpKindError {
                input: s.to_string(),
            })
    }
}
