//! Flip-flop latching on both clock edges through per-bit enables.

use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::DualEdgeParams;

/// Behavioural dual-edge flip-flop.
pub struct DualEdgeDut {
    pins: PinBank,
    defects: DefectSet,
    reset_value: u64,
    q: u64,
}

impl DualEdgeDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(layout: &BusLayout, params: &DualEdgeParams, defects: DefectSet) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            reset_value: params.reset_value,
            q: params.reset_value,
        }
    }
}

impl Dut for DualEdgeDut {
    fn kind(&self) -> StructureKind {
        StructureKind::DualEdgeFf
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
        if self.pins.is_high(Port::Reset) {
            self.q = self.reset_value;
        } else {
            let enable = match edge {
                Edge::Rising => self.pins.read(Port::PosLatchEn),
                Edge::Falling => self.pins.read(Port::NegLatchEn),
            };
            let d = self.pins.read(Port::DataIn);
            self.q = (self.q & !enable) | (d & enable);
        }
        self.pins.drive(Port::DataOut, self.defects.data(self.q));
    }
}
