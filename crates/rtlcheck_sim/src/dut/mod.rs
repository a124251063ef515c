//! Cycle-level behavioural designs.
//!
//! Each module implements one structure the way its RTL does: a node array
//! with a free slot search for the linked lists, a ring buffer for the FIFO,
//! a bucket array for the hash table. The designs keep their own storage and
//! never consult a reference model, so the scoreboard compares two
//! independent implementations.
//!
//! A design only reacts inside [`Dut::clock_edge`]: it samples its input
//! ports, updates state, and drives its registered outputs.

mod dual_edge;
mod fifo;
mod handshake;
mod hash_table;
mod lifo;
mod linked_list;
mod list;
mod table;

pub use dual_edge::DualEdgeDut;
pub use fifo::FifoDut;
pub use hash_table::HashTableDut;
pub use lifo::LifoDut;
pub use linked_list::LinkedListDut;
pub use list::ListDut;
pub use table::TableDut;

use crate::error::SimError;
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, SignalValue, StructureKind};
use rtlcheck_config::{Defect, StructureConfig};

/// A clocked design under test.
pub trait Dut {
    /// Structure implemented.
    fn kind(&self) -> StructureKind;

    /// Clock names, in the order the harness indexes them.
    fn clocks(&self) -> &'static [&'static str];

    /// Port values.
    fn pins(&self) -> &PinBank;

    /// Mutable port values.
    fn pins_mut(&mut self) -> &mut PinBank;

    /// Reacts to an edge of clock `clock`.
    fn clock_edge(&mut self, clock: usize, edge: Edge);

    /// Reads any port.
    fn peek(&self, port: Port) -> Option<SignalValue> {
        self.pins().get(port)
    }

    /// Drives an input port; takes effect at the next sampling edge.
    fn poke(&mut self, port: Port, value: SignalValue) -> Result<(), SimError> {
        self.pins_mut().set(port, value)
    }
}

/// Defects carried by a behavioural design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefectSet {
    /// Fault outputs never assert. Designs without a fault output instead
    /// hold their full and empty flags low.
    pub drop_fault: bool,
    /// The least significant bit of read data is inverted.
    pub corrupt_data: bool,
    /// The done handshake never asserts.
    pub never_done: bool,
    /// Capacity is one element short.
    pub early_full: bool,
    /// Status outputs are never driven.
    pub undriven_status: bool,
}

impl DefectSet {
    /// Collects a defect list.
    pub fn new(defects: &[Defect]) -> Self {
        let has = |d: Defect| defects.contains(&d);
        Self {
            drop_fault: has(Defect::DropFault),
            corrupt_data: has(Defect::CorruptData),
            never_done: has(Defect::NeverDone),
            early_full: has(Defect::EarlyFull),
            undriven_status: has(Defect::UndrivenStatus),
        }
    }

    /// Effective capacity.
    pub fn capacity(self, capacity: u64) -> u64 {
        if self.early_full {
            capacity.saturating_sub(1)
        } else {
            capacity
        }
    }

    /// Fault as driven onto the pin.
    pub fn fault(self, fault: bool) -> bool {
        fault && !self.drop_fault
    }

    /// Read data as driven onto the pin.
    pub fn data(self, value: u64) -> u64 {
        if self.corrupt_data {
            value ^ 1
        } else {
            value
        }
    }

    /// Full or empty flag as driven onto the pin.
    pub fn flag(self, flag: bool) -> bool {
        flag && !self.drop_fault
    }
}

/// Builds the behavioural design for a configured structure.
pub fn build_dut(
    config: &StructureConfig,
    layout: &BusLayout,
    latency: u32,
    defects: &[Defect],
) -> Box<dyn Dut> {
    let defects = DefectSet::new(defects);
    let dut: Box<dyn Dut> = match config {
        StructureConfig::SinglyLinkedList(p) | StructureConfig::DoublyLinkedList(p) => {
            Box::new(LinkedListDut::new(layout, p, latency, defects))
        }
        StructureConfig::Fifo(p) => Box::new(FifoDut::new(layout, p, defects)),
        StructureConfig::Lifo(p) => Box::new(LifoDut::new(layout, p, defects)),
        StructureConfig::HashTable(p) => Box::new(HashTableDut::new(layout, p, latency, defects)),
        StructureConfig::List(p) => Box::new(ListDut::new(layout, p, latency, defects)),
        StructureConfig::Table(p) => Box::new(TableDut::new(layout, p, defects)),
        StructureConfig::DualEdgeFf(p) => Box::new(DualEdgeDut::new(layout, p, defects)),
    };
    if defects.undriven_status {
        Box::new(UndrivenStatus(dut))
    } else {
        dut
    }
}

const STATUS_PORTS: [Port; 6] = [
    Port::Length,
    Port::Head,
    Port::Tail,
    Port::Full,
    Port::Empty,
    Port::CollisionCount,
];

/// A design whose status outputs float after every edge.
struct UndrivenStatus(Box<dyn Dut>);

impl Dut for UndrivenStatus {
    fn kind(&self) -> StructureKind {
        self.0.kind()
    }

    fn clocks(&self) -> &'static [&'static str] {
        self.0.clocks()
    }

    fn pins(&self) -> &PinBank {
        self.0.pins()
    }

    fn pins_mut(&mut self) -> &mut PinBank {
        self.0.pins_mut()
    }

    fn clock_edge(&mut self, clock: usize, edge: Edge) {
        self.0.clock_edge(clock, edge);
        let pins = self.0.pins_mut();
        for port in STATUS_PORTS {
            pins.float(port);
        }
    }
}

/// Clock list of single-clock designs.
pub(crate) const SINGLE_CLOCK: &[&str] = &["clk"];
