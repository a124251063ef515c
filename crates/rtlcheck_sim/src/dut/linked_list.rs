//! Linked list with a fixed node array.
//!
//! Node `i` lives at address `i`; a new node takes the lowest free slot.
//! Index-based operations walk the list from the head, one node per cycle,
//! so their latency grows with the position reached.

use super::handshake::{Beat, Handshake};
use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::LinkedListParams;

const OP_READ: u64 = 0b000;
const OP_INSERT_AT_ADDR: u64 = 0b001;
const OP_DELETE_VALUE: u64 = 0b010;
const OP_DELETE_AT_ADDR: u64 = 0b011;
const OP_INSERT_AT_INDEX: u64 = 0b101;
const OP_DELETE_AT_INDEX: u64 = 0b111;

#[derive(Clone, Copy, Debug, Default)]
struct NodeSlot {
    valid: bool,
    data: u64,
    next: u64,
    prev: u64,
}

/// Behavioural singly- or doubly-linked list.
pub struct LinkedListDut {
    kind: StructureKind,
    pins: PinBank,
    defects: DefectSet,
    latency: u32,
    null: u64,
    nodes: Vec<NodeSlot>,
    head: u64,
    tail: u64,
    length: u64,
    handshake: Handshake,
}

struct Outcome {
    walk: u64,
    fault: bool,
    read: Option<NodeSlot>,
}

impl Outcome {
    fn ok(walk: u64) -> Self {
        Self {
            walk,
            fault: false,
            read: None,
        }
    }

    fn fault(walk: u64) -> Self {
        Self {
            walk,
            fault: true,
            read: None,
        }
    }
}

impl LinkedListDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(
        layout: &BusLayout,
        params: &LinkedListParams,
        latency: u32,
        defects: DefectSet,
    ) -> Self {
        let null = params.null_addr();
        Self {
            kind: layout.kind,
            pins: PinBank::new(layout),
            defects,
            latency,
            null,
            nodes: vec![NodeSlot::default(); params.max_node as usize],
            head: null,
            tail: null,
            length: 0,
            handshake: Handshake::default(),
        }
    }

    fn is_full(&self) -> bool {
        self.length >= self.defects.capacity(self.null)
    }

    fn live(&self, addr: u64) -> Option<usize> {
        let i = usize::try_from(addr).ok()?;
        self.nodes.get(i).filter(|n| n.valid).map(|_| i)
    }

    fn set_next(&mut self, addr: u64, next: u64) {
        if addr == self.null {
            self.head = next;
        } else if let Some(n) = self.nodes.get_mut(addr as usize) {
            n.next = next;
        }
    }

    fn set_prev(&mut self, addr: u64, prev: u64) {
        if addr == self.null {
            self.tail = prev;
        } else if let Some(n) = self.nodes.get_mut(addr as usize) {
            n.prev = prev;
        }
    }

    /// Address of the node `steps` links after the head.
    fn walk(&self, steps: u64) -> u64 {
        let mut addr = self.head;
        for _ in 0..steps {
            match self.live(addr) {
                Some(i) => addr = self.nodes[i].next,
                None => break,
            }
        }
        addr
    }

    /// Links a new node between `prev` and `next` (either may be null).
    fn link(&mut self, prev: u64, next: u64, data: u64) {
        let Some(slot) = self.nodes.iter().position(|n| !n.valid) else {
            return;
        };
        self.nodes[slot] = NodeSlot {
            valid: true,
            data,
            next,
            prev,
        };
        let addr = slot as u64;
        self.set_next(prev, addr);
        self.set_prev(next, addr);
        self.length += 1;
    }

    fn insert_before(&mut self, at: u64, data: u64) {
        let prev = self.nodes[at as usize].prev;
        self.link(prev, at, data);
    }

    fn append(&mut self, data: u64) {
        self.link(self.tail, self.null, data);
    }

    fn unlink(&mut self, addr: u64) {
        let node = self.nodes[addr as usize];
        self.set_next(node.prev, node.next);
        self.set_prev(node.next, node.prev);
        self.nodes[addr as usize].valid = false;
        self.length -= 1;
    }

    fn execute(&mut self, op: u64, addr: u64, data: u64) -> Outcome {
        match op {
            OP_READ => match self.live(addr) {
                Some(i) => Outcome {
                    read: Some(self.nodes[i]),
                    ..Outcome::ok(0)
                },
                None => Outcome::fault(0),
            },
            OP_INSERT_AT_ADDR => {
                if self.is_full() || addr > self.null {
                    return Outcome::fault(0);
                }
                match self.live(addr) {
                    Some(_) => self.insert_before(addr, data),
                    None => self.append(data),
                }
                Outcome::ok(0)
            }
            OP_INSERT_AT_INDEX => {
                if self.is_full() || addr > self.null {
                    return Outcome::fault(0);
                }
                if addr >= self.length {
                    self.append(data);
                    return Outcome::ok(0);
                }
                let at = self.walk(addr);
                self.insert_before(at, data);
                Outcome::ok(addr)
            }
            OP_DELETE_VALUE => {
                let mut cursor = self.head;
                let mut steps = 0;
                while let Some(i) = self.live(cursor) {
                    if self.nodes[i].data == data {
                        self.unlink(cursor);
                        return Outcome::ok(steps);
                    }
                    cursor = self.nodes[i].next;
                    steps += 1;
                }
                Outcome::fault(steps)
            }
            OP_DELETE_AT_ADDR => match self.live(addr) {
                Some(_) => {
                    self.unlink(addr);
                    Outcome::ok(0)
                }
                None => Outcome::fault(0),
            },
            OP_DELETE_AT_INDEX => {
                if addr >= self.length {
                    return Outcome::fault(0);
                }
                let at = self.walk(addr);
                self.unlink(at);
                Outcome::ok(addr)
            }
            _ => Outcome::ok(0),
        }
    }

    fn status(&self) -> Beat {
        vec![
            (Port::Length, self.length),
            (Port::Head, self.head),
            (Port::Tail, self.tail),
            (Port::Full, u64::from(self.is_full())),
            (Port::Empty, u64::from(self.length == 0)),
        ]
    }

    fn reset(&mut self) {
        self.nodes.iter_mut().for_each(|n| *n = NodeSlot::default());
        self.head = self.null;
        self.tail = self.null;
        self.length = 0;
        self.handshake.clear();
        let mut outputs = vec![
            (Port::Done, 0),
            (Port::Fault, 0),
            (Port::DataOut, 0),
            (Port::NextAddr, self.null),
            (Port::PrevAddr, self.null),
        ];
        outputs.extend(self.status());
        for (port, value) in outputs {
            self.pins.drive(port, value);
        }
    }
}

impl Dut for LinkedListDut {
    fn kind(&self) -> StructureKind {
        self.kind
    }

    fn clocks(&self) -> &'static [&'static str] {
        SINGLE_CLOCK
    }

    fn pins(&self) -> &PinBank {
        &self.pins
    }

    fn pins_mut(&mut self) -> &mut PinBank {
        &mut self.pins
    }

    fn clock_edge(&mut self, _clock: usize, edge: Edge) {
        if edge != Edge::Rising {
            return;
        }
        if self.pins.is_high(Port::Reset) {
            self.reset();
            return;
        }
        self.pins.drive_bool(Port::Done, false);
        if !self.handshake.is_busy() && self.pins.is_high(Port::Start) {
            let op = self.pins.read(Port::Op);
            let addr = self.pins.read(Port::Addr);
            let data = self.pins.read(Port::DataIn);
            let outcome = self.execute(op, addr, data);
            tracing::trace!(op, addr, data, fault = outcome.fault, "linked list op");
            let mut beat = vec![(Port::Fault, u64::from(outcome.fault))];
            if let Some(node) = outcome.read {
                beat.extend([
                    (Port::DataOut, node.data),
                    (Port::NextAddr, node.next),
                    (Port::PrevAddr, node.prev),
                ]);
            }
            beat.extend(self.status());
            let wait = self.latency.saturating_add(outcome.walk as u32);
            self.handshake.begin(wait, vec![beat]);
        }
        self.handshake.advance(&mut self.pins, self.defects);
    }
}
