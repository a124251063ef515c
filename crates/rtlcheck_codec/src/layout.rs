//! Bus widths and port sets derived from the structure configuration.

use crate::port::{Direction, Port, PortSpec};
use rtlcheck_common::{bits_for, StructureKind};
use rtlcheck_config::StructureConfig;

/// Field widths and signal set of one configured design.
///
/// Widths are fixed for the session; the encoder, the random generator, and
/// the behavioural design all take their ranges from here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusLayout {
    /// Structure kind.
    pub kind: StructureKind,
    /// Width of stored values.
    pub data_width: u32,
    /// Width of an address, index, or index lane.
    pub addr_width: u32,
    /// Width of a hash key, zero for other kinds.
    pub key_width: u32,
    /// Width of the primary data output.
    pub out_width: u32,
    /// Write lanes per cycle.
    pub input_lanes: u32,
    /// Read lanes per cycle.
    pub output_lanes: u32,
    /// The null address of linked lists.
    pub null_addr: Option<u64>,
    /// Declared capacity.
    pub capacity: Option<u64>,
    ports: Vec<PortSpec>,
}

const OPCODE_WIDTH: u32 = 3;
const HASH_OPCODE_WIDTH: u32 = 2;

impl BusLayout {
    /// Derives the layout of a configured structure.
    pub fn new(config: &StructureConfig) -> Self {
        let kind = config.kind();
        let mut layout = Self {
            kind,
            data_width: config.data_width(),
            addr_width: 0,
            key_width: 0,
            out_width: config.data_width(),
            input_lanes: 1,
            output_lanes: 1,
            null_addr: None,
            capacity: config.capacity(),
            ports: vec![PortSpec::input(Port::Reset, "rst", 1)],
        };
        let dw = layout.data_width;
        match config {
            StructureConfig::SinglyLinkedList(p) | StructureConfig::DoublyLinkedList(p) => {
                let aw = p.addr_width();
                layout.addr_width = aw;
                layout.null_addr = Some(p.null_addr());
                layout.ports.extend([
                    PortSpec::input(Port::Op, "op", OPCODE_WIDTH),
                    PortSpec::input(Port::Start, "op_start", 1),
                    PortSpec::input(Port::Addr, "addr_in", aw),
                    PortSpec::input(Port::DataIn, "data_in", dw),
                    PortSpec::output(Port::DataOut, "data_out", dw),
                    PortSpec::output(Port::Done, "op_done", 1),
                    PortSpec::output(Port::Fault, "fault", 1),
                    PortSpec::output(Port::NextAddr, "next_node_addr", aw),
                ]);
                if kind == StructureKind::DoublyLinkedList {
                    layout
                        .ports
                        .push(PortSpec::output(Port::PrevAddr, "pre_node_addr", aw));
                }
                layout.ports.extend([
                    PortSpec::output(Port::Length, "length", aw),
                    PortSpec::output(Port::Head, "head", aw),
                    PortSpec::output(Port::Tail, "tail", aw),
                    PortSpec::output(Port::Full, "full", 1),
                    PortSpec::output(Port::Empty, "empty", 1),
                ]);
            }
            StructureConfig::Fifo(_) | StructureConfig::Lifo(_) => {
                let (full, empty) = if kind == StructureKind::Fifo {
                    ("fifo_full", "fifo_empty")
                } else {
                    ("lifo_full", "lifo_empty")
                };
                layout.ports.extend([
                    PortSpec::input(Port::WrEn, "wr_en", 1),
                    PortSpec::input(Port::WrData, "data_wr", dw),
                    PortSpec::input(Port::RdEn, "rd_en", 1),
                    PortSpec::output(Port::RdData, "data_rd", dw),
                    PortSpec::output(Port::Full, full, 1),
                    PortSpec::output(Port::Empty, empty, 1),
                ]);
            }
            StructureConfig::HashTable(p) => {
                layout.key_width = p.key_width;
                layout.ports.extend([
                    PortSpec::input(Port::Op, "op_sel", HASH_OPCODE_WIDTH),
                    PortSpec::input(Port::Start, "op_en", 1),
                    PortSpec::input(Port::Key, "key_in", p.key_width),
                    PortSpec::input(Port::DataIn, "value_in", dw),
                    PortSpec::output(Port::DataOut, "value_out", dw),
                    PortSpec::output(Port::Done, "op_done", 1),
                    PortSpec::output(Port::Fault, "op_error", 1),
                    PortSpec::output(Port::CollisionCount, "collision_count", p.collision_width()),
                ]);
            }
            StructureConfig::List(p) => {
                let iw = p.index_width();
                layout.addr_width = iw;
                layout.out_width = p.out_width();
                layout.ports.extend([
                    PortSpec::input(Port::Op, "op_sel", OPCODE_WIDTH),
                    PortSpec::input(Port::Start, "op_en", 1),
                    PortSpec::input(Port::Addr, "index_in", iw),
                    PortSpec::input(Port::DataIn, "data_in", dw),
                    PortSpec::output(Port::DataOut, "data_out", p.out_width()),
                    PortSpec::output(Port::Done, "op_done", 1),
                    PortSpec::output(Port::InProgress, "op_in_progress", 1),
                    PortSpec::output(Port::Fault, "op_error", 1),
                    PortSpec::output(Port::Length, "len", iw),
                ]);
            }
            StructureConfig::Table(p) => {
                let iw = bits_for(p.table_size.saturating_sub(1));
                layout.addr_width = iw;
                layout.input_lanes = p.input_rate;
                layout.output_lanes = p.output_rate;
                layout.ports.extend([
                    PortSpec::input(Port::WrEn, "wr_en", p.input_rate),
                    PortSpec::input(Port::WrIndex, "index_wr", p.input_rate * iw),
                    PortSpec::input(Port::WrData, "data_wr", p.input_rate * dw),
                    PortSpec::input(Port::RdEn, "rd_en", 1),
                    PortSpec::input(Port::RdIndex, "index_rd", p.output_rate * iw),
                    PortSpec::output(Port::RdData, "data_rd", p.output_rate * dw),
                ]);
            }
            StructureConfig::DualEdgeFf(_) => {
                layout.ports.extend([
                    PortSpec::input(Port::DataIn, "data_in", dw),
                    PortSpec::input(Port::PosLatchEn, "pos_edge_latch_en", dw),
                    PortSpec::input(Port::NegLatchEn, "neg_edge_latch_en", dw),
                    PortSpec::output(Port::DataOut, "data_out", dw),
                ]);
            }
        }
        layout
    }

    /// Every port, inputs first.
    pub fn ports(&self) -> &[PortSpec] {
        &self.ports
    }

    /// Looks up the spec of a port.
    pub fn spec(&self, port: Port) -> Option<&PortSpec> {
        self.ports.iter().find(|s| s.port == port)
    }

    /// Width of a port, if the design has it.
    pub fn width(&self, port: Port) -> Option<u32> {
        self.spec(port).map(|s| s.width)
    }

    /// Returns true if the design has the port.
    pub fn has(&self, port: Port) -> bool {
        self.spec(port).is_some()
    }

    /// Input ports.
    pub fn inputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports
            .iter()
            .filter(|s| s.direction == Direction::Input)
    }

    /// Output ports.
    pub fn outputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports
            .iter()
            .filter(|s| s.direction == Direction::Output)
    }

    /// Largest value representable in `width` bits.
    pub fn max_for(width: u32) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }
}
