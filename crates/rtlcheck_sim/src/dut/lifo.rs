//! Single-clock LIFO.
//!
//! A push and a pop sampled on the same edge bypass the storage: the written
//! value goes straight to the read port and the stack is unchanged.

use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::LifoParams;

/// Behavioural LIFO.
pub struct LifoDut {
    pins: PinBank,
    defects: DefectSet,
    depth: u64,
    mem: Vec<u64>,
    sp: usize,
}

impl LifoDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(layout: &BusLayout, params: &LifoParams, defects: DefectSet) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            depth: params.depth,
            mem: vec![0; params.depth as usize],
            sp: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.defects.capacity(self.depth) as usize
    }

    fn transfer(&mut self) {
        let wr = self.pins.is_high(Port::WrEn);
        let rd = self.pins.is_high(Port::RdEn);
        let data = self.pins.read(Port::WrData);
        match (wr, rd) {
            (true, true) => self.pins.drive(Port::RdData, self.defects.data(data)),
            (true, false) if self.sp < self.capacity() => {
                self.mem[self.sp] = data;
                self.sp += 1;
            }
            (false, true) if self.sp > 0 => {
                self.sp -= 1;
                let value = self.mem[self.sp];
                self.pins.drive(Port::RdData, self.defects.data(value));
            }
            _ => {}
        }
    }
}

impl Dut for LifoDut {
    fn kind(&self) -> StructureKind {
        StructureKind::Lifo
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
            self.sp = 0;
            self.pins.drive(Port::RdData, 0);
        } else {
            self.transfer();
        }
        let full = self.defects.flag(self.sp >= self.capacity());
        let empty = self.defects.flag(self.sp == 0);
        self.pins.drive_bool(Port::Full, full);
        self.pins.drive_bool(Port::Empty, empty);
    }
}
