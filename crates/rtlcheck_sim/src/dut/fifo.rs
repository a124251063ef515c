//! Dual-clock FIFO over a ring buffer.
//!
//! Writes are taken on `wr_clk`, reads on `rd_clk`. The occupancy count is
//! shared, so both flags reflect every transfer as soon as it happens; a
//! write while full and a read while empty are ignored. With the read buffer
//! enabled, read data passes through one extra register and appears one
//! read-clock edge after the pop.

use super::{DefectSet, Dut};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::FifoParams;

const WR_CLK: usize = 0;
const RD_CLK: usize = 1;

/// Behavioural FIFO.
pub struct FifoDut {
    pins: PinBank,
    defects: DefectSet,
    rd_buffer: bool,
    mem: Vec<u64>,
    wr_ptr: usize,
    rd_ptr: usize,
    count: u64,
    staged: Option<u64>,
}

impl FifoDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(layout: &BusLayout, params: &FifoParams, defects: DefectSet) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            rd_buffer: params.rd_buffer,
            mem: vec![0; params.depth as usize],
            wr_ptr: 0,
            rd_ptr: 0,
            count: 0,
            staged: None,
        }
    }

    fn capacity(&self) -> u64 {
        self.defects.capacity(self.mem.len() as u64)
    }

    fn write(&mut self) {
        if !self.pins.is_high(Port::WrEn) || self.count >= self.capacity() {
            return;
        }
        self.mem[self.wr_ptr] = self.pins.read(Port::WrData);
        self.wr_ptr = (self.wr_ptr + 1) % self.mem.len();
        self.count += 1;
    }

    fn read(&mut self) {
        if let Some(value) = self.staged.take() {
            self.pins.drive(Port::RdData, self.defects.data(value));
        }
        if !self.pins.is_high(Port::RdEn) || self.count == 0 {
            return;
        }
        let value = self.mem[self.rd_ptr];
        self.rd_ptr = (self.rd_ptr + 1) % self.mem.len();
        self.count -= 1;
        if self.rd_buffer {
            self.staged = Some(value);
        } else {
            self.pins.drive(Port::RdData, self.defects.data(value));
        }
    }

    fn drive_flags(&mut self) {
        let full = self.defects.flag(self.count >= self.capacity());
        let empty = self.defects.flag(self.count == 0);
        self.pins.drive_bool(Port::Full, full);
        self.pins.drive_bool(Port::Empty, empty);
    }
}

impl Dut for FifoDut {
    fn kind(&self) -> StructureKind {
        StructureKind::Fifo
    }

    fn clocks(&self) -> &'static [&'static str] {
        &["wr_clk", "rd_clk"]
    }

    fn pins(&self) -> &PinBank {
        &self.pins
    }

    fn pins_mut(&mut self) -> &mut PinBank {
        &mut self.pins
    }

    fn clock_edge(&mut self, clock: usize, edge: Edge) {
        if edge != Edge::Rising {
            return;
        }
        if self.pins.is_high(Port::Reset) {
            self.wr_ptr = 0;
            self.rd_ptr = 0;
            self.count = 0;
            self.staged = None;
            self.pins.drive(Port::RdData, 0);
        } else {
            match clock {
                WR_CLK => self.write(),
                RD_CLK => self.read(),
                _ => {}
            }
        }
        self.drive_flags();
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{cycle, get, high, reset, set};
    use super::*;
    use rtlcheck_config::StructureConfig;

    fn fifo(params: FifoParams, defects: DefectSet) -> FifoDut {
        let layout = BusLayout::new(&StructureConfig::Fifo(params.clone()));
        let mut dut = FifoDut::new(&layout, &params, defects);
        reset(&mut dut);
        dut
    }

    fn write(dut: &mut FifoDut, value: u64) {
        set(dut, Port::WrEn, 1);
        set(dut, Port::WrData, value);
        cycle(dut, WR_CLK);
        set(dut, Port::WrEn, 0);
    }

    fn read(dut: &mut FifoDut) -> u64 {
        set(dut, Port::RdEn, 1);
        cycle(dut, RD_CLK);
        set(dut, Port::RdEn, 0);
        if dut.rd_buffer {
            cycle(dut, RD_CLK);
        }
        get(dut, Port::RdData)
    }

    #[test]
    fn reset_flags() {
        let dut = fifo(FifoParams::default(), DefectSet::default());
        assert!(high(&dut, Port::Empty));
        assert!(!high(&dut, Port::Full));
    }

    #[test]
    fn order_preserved_through_wrap() {
        let params = FifoParams {
            depth: 4,
            ..FifoParams::default()
        };
        let mut dut = fifo(params, DefectSet::default());
        for v in [1, 2, 3] {
            write(&mut dut, v);
        }
        assert_eq!(read(&mut dut), 1);
        for v in [4, 5] {
            write(&mut dut, v);
        }
        assert!(high(&dut, Port::Full));
        let out: Vec<u64> = (0..4).map(|_| read(&mut dut)).collect();
        assert_eq!(out, vec![2, 3, 4, 5]);
        assert!(high(&dut, Port::Empty));
    }

    #[test]
    fn write_when_full_is_dropped() {
        let params = FifoParams {
            depth: 2,
            ..FifoParams::default()
        };
        let mut dut = fifo(params, DefectSet::default());
        for v in [7, 8, 9] {
            write(&mut dut, v);
        }
        assert_eq!(dut.count, 2);
        assert_eq!(read(&mut dut), 7);
        assert_eq!(read(&mut dut), 8);
    }

    #[test]
    fn unbuffered_read_is_immediate() {
        let params = FifoParams {
            rd_buffer: false,
            ..FifoParams::default()
        };
        let mut dut = fifo(params, DefectSet::default());
        write(&mut dut, 0x5a);
        set(&mut dut, Port::RdEn, 1);
        cycle(&mut dut, RD_CLK);
        assert_eq!(get(&dut, Port::RdData), 0x5a);
    }

    #[test]
    fn buffered_read_lags_one_edge() {
        let mut dut = fifo(FifoParams::default(), DefectSet::default());
        write(&mut dut, 0x11);
        set(&mut dut, Port::RdEn, 1);
        cycle(&mut dut, RD_CLK);
        assert_eq!(get(&dut, Port::RdData), 0);
        set(&mut dut, Port::RdEn, 0);
        cycle(&mut dut, RD_CLK);
        assert_eq!(get(&dut, Port::RdData), 0x11);
    }

    #[test]
    fn early_full_defect() {
        let params = FifoParams {
            depth: 3,
            ..FifoParams::default()
        };
        let defects = DefectSet {
            early_full: true,
            ..DefectSet::default()
        };
        let mut dut = fifo(params, defects);
        write(&mut dut, 1);
        write(&mut dut, 2);
        assert!(high(&dut, Port::Full));
    }
}
