//! Per-structure bus protocol: how an operation starts, completes, and
//! reports its result.
//!
//! Opcode designs take an operation when `start` rises and answer with a
//! `done` pulse some cycles later. Enable designs (FIFO, LIFO, table) act on
//! the edge that samples the enable and have no handshake. The dual-edge
//! flip-flop latches on every edge.

use rtlcheck_codec::Port;
use rtlcheck_common::{Edge, OpKind, Operation, StructureKind};

/// What tells a monitor that an operation began.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// `start` sampled high after being low.
    StartRise,
    /// Any enable sampled high.
    EnableLevel,
    /// Every acting edge carries an operation.
    EveryEdge,
}

/// How long a driver holds the assert frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnableStyle {
    /// Held until the operation completes.
    Hold,
    /// Released right after the sampling edge.
    Pulse,
}

/// When an operation is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// `done` sampled high.
    Done,
    /// A stream of `done` beats, the last with `op_in_progress` low.
    DoneStream,
    /// A fixed number of edges after sampling; zero means at the sampling edge.
    Fixed(u32),
}

/// Where the fault flag of an operation comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultSource {
    /// The design's fault output.
    Signal,
    /// The full flag as it stood before the sampling edge.
    PreEdgeFull,
    /// The empty flag as it stood before the sampling edge.
    PreEdgeEmpty,
    /// The operation cannot fault.
    None,
}

/// The complete protocol of one operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Protocol {
    /// Start detection.
    pub trigger: Trigger,
    /// Enable hold policy.
    pub enable: EnableStyle,
    /// Completion rule.
    pub completion: Completion,
    /// Edges between completion and a valid read value.
    pub capture_delay: u32,
    /// Fault origin.
    pub fault: FaultSource,
    /// Port carrying the result value.
    pub value_port: Port,
    /// Packed result lanes; zero for a scalar result.
    pub value_lanes: u32,
}

impl Protocol {
    /// Protocol of `op` on a `kind` design. `read_buffer` is set when a FIFO
    /// registers its read data one more cycle.
    pub fn for_op(kind: StructureKind, op: &Operation, read_buffer: bool) -> Self {
        let trigger = Self::trigger(kind);
        match kind {
            StructureKind::SinglyLinkedList
            | StructureKind::DoublyLinkedList
            | StructureKind::HashTable
            | StructureKind::List => Self {
                trigger,
                enable: if kind == StructureKind::HashTable {
                    EnableStyle::Pulse
                } else {
                    EnableStyle::Hold
                },
                completion: if op.kind() == OpKind::FindAll {
                    Completion::DoneStream
                } else {
                    Completion::Done
                },
                capture_delay: 0,
                fault: FaultSource::Signal,
                value_port: Port::DataOut,
                value_lanes: 0,
            },
            StructureKind::Fifo | StructureKind::Lifo => Self {
                trigger,
                enable: EnableStyle::Pulse,
                completion: Completion::Fixed(0),
                capture_delay: u32::from(read_buffer && op.kind() == OpKind::Dequeue),
                fault: match op.kind() {
                    OpKind::Enqueue | OpKind::Push => FaultSource::PreEdgeFull,
                    OpKind::Dequeue | OpKind::Pop => FaultSource::PreEdgeEmpty,
                    _ => FaultSource::None,
                },
                value_port: Port::RdData,
                value_lanes: 0,
            },
            StructureKind::Table => Self {
                trigger,
                enable: EnableStyle::Pulse,
                completion: Completion::Fixed(0),
                capture_delay: 0,
                fault: FaultSource::None,
                value_port: Port::RdData,
                value_lanes: match op {
                    Operation::TableAccess { reads, .. } => reads.len() as u32,
                    _ => 0,
                },
            },
            StructureKind::DualEdgeFf => Self {
                trigger,
                enable: EnableStyle::Pulse,
                completion: Completion::Fixed(0),
                capture_delay: 0,
                fault: FaultSource::None,
                value_port: Port::DataOut,
                value_lanes: 0,
            },
        }
    }

    /// Start detection used by monitors of a `kind` design.
    pub fn trigger(kind: StructureKind) -> Trigger {
        match kind {
            StructureKind::SinglyLinkedList
            | StructureKind::DoublyLinkedList
            | StructureKind::HashTable
            | StructureKind::List => Trigger::StartRise,
            StructureKind::Fifo | StructureKind::Lifo | StructureKind::Table => {
                Trigger::EnableLevel
            }
            StructureKind::DualEdgeFf => Trigger::EveryEdge,
        }
    }

    /// Returns true if completion is signalled by the design.
    pub fn has_handshake(&self) -> bool {
        matches!(self.completion, Completion::Done | Completion::DoneStream)
    }
}

/// One independently clocked interface of a design and the operations it
/// carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentRole {
    /// Role name used in logs.
    pub name: &'static str,
    /// Clock index the role acts on.
    pub clock: usize,
    /// Operations carried.
    pub ops: Vec<OpKind>,
    /// Inputs owned by the role; `None` means every input.
    pub inputs: Option<Vec<Port>>,
    /// Acts on falling edges as well as rising ones.
    pub both_edges: bool,
}

impl AgentRole {
    /// Roles of a `kind` design. A FIFO has independent write and read
    /// sides; every other design has a single interface.
    pub fn for_structure(kind: StructureKind) -> Vec<AgentRole> {
        if kind == StructureKind::Fifo {
            return vec![
                AgentRole {
                    name: "write",
                    clock: 0,
                    ops: vec![OpKind::Enqueue],
                    inputs: Some(vec![Port::WrEn, Port::WrData]),
                    both_edges: false,
                },
                AgentRole {
                    name: "read",
                    clock: 1,
                    ops: vec![OpKind::Dequeue],
                    inputs: Some(vec![Port::RdEn]),
                    both_edges: false,
                },
            ];
        }
        vec![AgentRole {
            name: "main",
            clock: 0,
            ops: kind
                .supported_ops()
                .iter()
                .copied()
                .filter(|k| *k != OpKind::Idle)
                .collect(),
            inputs: None,
            both_edges: kind == StructureKind::DualEdgeFf,
        }]
    }

    /// Returns true if the role reacts to an edge of `clock`.
    pub fn acts_on(&self, clock: usize, edge: Edge) -> bool {
        self.clock == clock && (self.both_edges || edge == Edge::Rising)
    }

    /// Returns true if the role carries operations of `kind`.
    pub fn carries(&self, kind: OpKind) -> bool {
        self.ops.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_designs_hold_until_done() {
        let p = Protocol::for_op(
            StructureKind::DoublyLinkedList,
            &Operation::Read { target: 0 },
            false,
        );
        assert_eq!(p.trigger, Trigger::StartRise);
        assert_eq!(p.enable, EnableStyle::Hold);
        assert_eq!(p.completion, Completion::Done);
        assert!(p.has_handshake());
    }

    #[test]
    fn find_all_streams() {
        let p = Protocol::for_op(StructureKind::List, &Operation::FindAll { value: 1 }, false);
        assert_eq!(p.completion, Completion::DoneStream);
    }

    #[test]
    fn fifo_faults_come_from_pre_edge_flags() {
        let enq = Protocol::for_op(StructureKind::Fifo, &Operation::Enqueue { value: 1 }, true);
        let deq = Protocol::for_op(StructureKind::Fifo, &Operation::Dequeue, true);
        assert_eq!(enq.fault, FaultSource::PreEdgeFull);
        assert_eq!(enq.capture_delay, 0);
        assert_eq!(deq.fault, FaultSource::PreEdgeEmpty);
        assert_eq!(deq.capture_delay, 1);
        assert!(!deq.has_handshake());
    }

    #[test]
    fn table_reads_are_lanes() {
        let p = Protocol::for_op(StructureKind::Table, &Operation::read_lanes(vec![1, 2]), false);
        assert_eq!(p.value_lanes, 2);
        assert_eq!(p.fault, FaultSource::None);
    }

    #[test]
    fn fifo_has_two_roles() {
        let roles = AgentRole::for_structure(StructureKind::Fifo);
        assert_eq!(roles.len(), 2);
        assert!(roles[0].carries(OpKind::Enqueue));
        assert!(roles[1].carries(OpKind::Dequeue));
        assert!(roles[1].acts_on(1, Edge::Rising));
        assert!(!roles[1].acts_on(0, Edge::Rising));
    }

    #[test]
    fn dual_edge_role_acts_on_both_edges() {
        let roles = AgentRole::for_structure(StructureKind::DualEdgeFf);
        assert!(roles[0].acts_on(0, Edge::Falling));
        assert!(!roles[0].carries(OpKind::Idle));
        let lifo = AgentRole::for_structure(StructureKind::Lifo);
        assert!(!lifo[0].acts_on(0, Edge::Falling));
    }
}
