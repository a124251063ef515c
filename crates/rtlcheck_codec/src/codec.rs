//! Operation encoding onto input ports and decoding from sampled inputs.

use crate::error::CodecError;
use crate::layout::BusLayout;
use crate::opcode::{opcode_table, Fields};
use crate::port::Port;
use rtlcheck_common::{Edge, LaneWrite, Operation, SignalValue, StructureKind};
use std::collections::BTreeMap;

/// Input port values sampled at one clock edge.
pub type PortSample = BTreeMap<Port, SignalValue>;

/// The input values that apply one operation.
///
/// `assert` is driven for the sampling edge; `release` returns the enables
/// to idle once the design has taken the operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriveFrame {
    /// Values driven to start the operation.
    pub assert: Vec<(Port, SignalValue)>,
    /// Values driven to end it.
    pub release: Vec<(Port, SignalValue)>,
}

/// Bidirectional mapping between operations and a design's input ports.
#[derive(Clone, Debug)]
pub struct Codec {
    layout: BusLayout,
}

impl Codec {
    /// Creates a codec for a layout.
    pub fn new(layout: BusLayout) -> Self {
        Self { layout }
    }

    /// The layout this codec encodes for.
    pub fn layout(&self) -> &BusLayout {
        &self.layout
    }

    fn bus(&self, field: &'static str, port: Port, value: u64) -> Result<SignalValue, CodecError> {
        let width = self.layout.width(port).unwrap_or(0);
        if value > BusLayout::max_for(width) {
            return Err(CodecError::ValueOutOfRange {
                field,
                value,
                width,
            });
        }
        Ok(SignalValue::from_u64(value, width))
    }

    fn check_lane(&self, field: &'static str, value: u64, width: u32) -> Result<(), CodecError> {
        if value > BusLayout::max_for(width) {
            return Err(CodecError::ValueOutOfRange {
                field,
                value,
                width,
            });
        }
        Ok(())
    }

    /// Encodes an operation.
    ///
    /// [`Operation::Idle`] encodes to an empty frame: nothing is driven.
    pub fn encode(&self, op: &Operation) -> Result<DriveFrame, CodecError> {
        let kind = self.layout.kind;
        if !kind.supports(op.kind()) {
            return Err(CodecError::Unsupported {
                op: op.kind(),
                kind,
            });
        }
        if op.is_idle() {
            return Ok(DriveFrame::default());
        }
        match kind {
            StructureKind::SinglyLinkedList
            | StructureKind::DoublyLinkedList
            | StructureKind::HashTable
            | StructureKind::List => self.encode_opcode(op),
            StructureKind::Fifo | StructureKind::Lifo => self.encode_enables(op),
            StructureKind::Table => self.encode_table(op),
            StructureKind::DualEdgeFf => self.encode_latch(op),
        }
    }

    fn encode_opcode(&self, op: &Operation) -> Result<DriveFrame, CodecError> {
        let kind = self.layout.kind;
        let unsupported = CodecError::Unsupported {
            op: op.kind(),
            kind,
        };
        let table = opcode_table(kind).ok_or_else(|| unsupported.clone())?;
        let code = table.code_of(op.kind()).ok_or(unsupported)?;
        let mut fields = Fields::default();
        match op {
            Operation::Read { target } => fields.addr = *target,
            Operation::InsertAtAddr { addr, value } => {
                fields.addr = *addr;
                fields.data = *value;
            }
            Operation::InsertAtIndex { index, value } => {
                fields.addr = *index;
                fields.data = *value;
            }
            Operation::DeleteAtAddr { addr } => fields.addr = *addr,
            Operation::DeleteAtIndex { index } => fields.addr = *index,
            Operation::DeleteByValue { value }
            | Operation::FindFirst { value }
            | Operation::FindAll { value } => fields.data = *value,
            Operation::Insert { key, value } => {
                fields.key = *key;
                fields.data = *value;
            }
            Operation::DeleteKey { key } | Operation::Search { key } => fields.key = *key,
            _ => {}
        }

        let mut assert = vec![(Port::Op, SignalValue::from_u64(code, table.width))];
        if self.layout.has(Port::Addr) {
            assert.push((Port::Addr, self.bus("addr", Port::Addr, fields.addr)?));
        }
        if self.layout.has(Port::Key) {
            assert.push((Port::Key, self.bus("key", Port::Key, fields.key)?));
        }
        assert.push((Port::DataIn, self.bus("data", Port::DataIn, fields.data)?));
        assert.push((Port::Start, SignalValue::from_bool(true)));
        Ok(DriveFrame {
            assert,
            release: vec![(Port::Start, SignalValue::from_bool(false))],
        })
    }

    fn encode_enables(&self, op: &Operation) -> Result<DriveFrame, CodecError> {
        let high = SignalValue::from_bool(true);
        let low = SignalValue::from_bool(false);
        let (write, read) = match op {
            Operation::Enqueue { value } | Operation::Push { value } => (Some(*value), false),
            Operation::Dequeue | Operation::Pop => (None, true),
            Operation::PushPop { value } => (Some(*value), true),
            other => {
                return Err(CodecError::Unsupported {
                    op: other.kind(),
                    kind: self.layout.kind,
                })
            }
        };
        let mut frame = DriveFrame::default();
        if let Some(value) = write {
            frame
                .assert
                .push((Port::WrData, self.bus("data", Port::WrData, value)?));
            frame.assert.push((Port::WrEn, high));
            frame.release.push((Port::WrEn, low));
        }
        if read {
            frame.assert.push((Port::RdEn, high));
            frame.release.push((Port::RdEn, low));
        }
        Ok(frame)
    }

    fn encode_table(&self, op: &Operation) -> Result<DriveFrame, CodecError> {
        let Operation::TableAccess { writes, reads } = op else {
            return Err(CodecError::Unsupported {
                op: op.kind(),
                kind: self.layout.kind,
            });
        };
        let l = &self.layout;
        if writes.len() > l.input_lanes as usize {
            return Err(CodecError::TooManyLanes {
                direction: "write",
                count: writes.len(),
                available: l.input_lanes,
            });
        }
        if reads.len() > l.output_lanes as usize {
            return Err(CodecError::TooManyLanes {
                direction: "read",
                count: reads.len(),
                available: l.output_lanes,
            });
        }
        for w in writes {
            self.check_lane("index", w.index, l.addr_width)?;
            self.check_lane("data", w.value, l.data_width)?;
        }
        for r in reads {
            self.check_lane("index", *r, l.addr_width)?;
        }

        let indices: Vec<u64> = writes.iter().map(|w| w.index).collect();
        let values: Vec<u64> = writes.iter().map(|w| w.value).collect();
        let mask = (1u64 << writes.len()) - 1;
        let assert = vec![
            (
                Port::WrIndex,
                SignalValue::pack_lanes(&indices, l.addr_width, l.input_lanes),
            ),
            (
                Port::WrData,
                SignalValue::pack_lanes(&values, l.data_width, l.input_lanes),
            ),
            (Port::WrEn, SignalValue::from_u64(mask, l.input_lanes)),
            (
                Port::RdIndex,
                SignalValue::pack_lanes(reads, l.addr_width, l.output_lanes),
            ),
            (Port::RdEn, SignalValue::from_bool(!reads.is_empty())),
        ];
        Ok(DriveFrame {
            assert,
            release: vec![
                (Port::WrEn, SignalValue::new(l.input_lanes)),
                (Port::RdEn, SignalValue::from_bool(false)),
            ],
        })
    }

    fn encode_latch(&self, op: &Operation) -> Result<DriveFrame, CodecError> {
        let Operation::EdgeLatch {
            edge,
            value,
            enable,
        } = op
        else {
            return Err(CodecError::Unsupported {
                op: op.kind(),
                kind: self.layout.kind,
            });
        };
        let w = self.layout.data_width;
        let enable = self.bus("enable", Port::PosLatchEn, *enable)?;
        let idle = SignalValue::new(w);
        let (pos, neg) = match edge {
            Edge::Rising => (enable, idle),
            Edge::Falling => (idle, enable),
        };
        Ok(DriveFrame {
            assert: vec![
                (Port::DataIn, self.bus("data", Port::DataIn, *value)?),
                (Port::PosLatchEn, pos),
                (Port::NegLatchEn, neg),
            ],
            release: vec![(Port::PosLatchEn, idle), (Port::NegLatchEn, idle)],
        })
    }

    /// Rebuilds the operation a design sampled at `edge` from its input ports.
    ///
    /// Missing or unknown inputs read as zero; an opcode outside the table or
    /// an idle enable pattern decodes to [`Operation::Idle`].
    pub fn decode(&self, sample: &PortSample, edge: Edge) -> Operation {
        let read = |port: Port| sample.get(&port).and_then(|v| v.to_u64()).unwrap_or(0);
        let high = |port: Port| sample.get(&port).is_some_and(|v| v.is_high());
        let l = &self.layout;
        match l.kind {
            StructureKind::SinglyLinkedList
            | StructureKind::DoublyLinkedList
            | StructureKind::HashTable
            | StructureKind::List => {
                let Some(table) = opcode_table(l.kind) else {
                    return Operation::Idle;
                };
                let Some(code) = sample.get(&Port::Op).and_then(|v| v.to_u64()) else {
                    return Operation::Idle;
                };
                let fields = Fields {
                    addr: read(Port::Addr),
                    data: read(Port::DataIn),
                    key: read(Port::Key),
                };
                table.decode(code, &fields)
            }
            StructureKind::Fifo => {
                if high(Port::WrEn) {
                    Operation::Enqueue {
                        value: read(Port::WrData),
                    }
                } else if high(Port::RdEn) {
                    Operation::Dequeue
                } else {
                    Operation::Idle
                }
            }
            StructureKind::Lifo => match (high(Port::WrEn), high(Port::RdEn)) {
                (true, true) => Operation::PushPop {
                    value: read(Port::WrData),
                },
                (true, false) => Operation::Push {
                    value: read(Port::WrData),
                },
                (false, true) => Operation::Pop,
                (false, false) => Operation::Idle,
            },
            StructureKind::Table => {
                let mask = read(Port::WrEn);
                let indices = sample.get(&Port::WrIndex);
                let values = sample.get(&Port::WrData);
                let writes: Vec<LaneWrite> = (0..l.input_lanes)
                    .filter(|lane| (mask >> lane) & 1 == 1)
                    .map(|lane| LaneWrite {
                        index: indices
                            .and_then(|v| v.lane(lane, l.addr_width))
                            .unwrap_or(0),
                        value: values
                            .and_then(|v| v.lane(lane, l.data_width))
                            .unwrap_or(0),
                    })
                    .collect();
                let reads: Vec<u64> = if high(Port::RdEn) {
                    let rd = sample.get(&Port::RdIndex);
                    (0..l.output_lanes)
                        .map(|lane| rd.and_then(|v| v.lane(lane, l.addr_width)).unwrap_or(0))
                        .collect()
                } else {
                    Vec::new()
                };
                if writes.is_empty() && reads.is_empty() {
                    Operation::Idle
                } else {
                    Operation::TableAccess { writes, reads }
                }
            }
            StructureKind::DualEdgeFf => {
                let enable_port = match edge {
                    Edge::Rising => Port::PosLatchEn,
                    Edge::Falling => Port::NegLatchEn,
                };
                match read(enable_port) {
                    0 => Operation::Idle,
                    enable => Operation::EdgeLatch {
                        edge,
                        value: read(Port::DataIn),
                        enable,
                    },
                }
            }
        }
    }
}
