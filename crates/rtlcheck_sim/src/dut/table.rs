//! Multi-port register table.
//!
//! Reads are registered and see the table as it was before the same edge's
//! writes. Write lanes are applied in lane order, so the highest lane wins
//! when several target one slot. Out-of-range indices read zero and never
//! write.

use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, SignalValue, StructureKind};
use rtlcheck_config::TableParams;

/// Behavioural register table.
pub struct TableDut {
    pins: PinBank,
    defects: DefectSet,
    index_width: u32,
    data_width: u32,
    input_rate: u32,
    output_rate: u32,
    reset_value: u64,
    slots: Vec<u64>,
}

impl TableDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(layout: &BusLayout, params: &TableParams, defects: DefectSet) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            index_width: layout.addr_width,
            data_width: params.data_width,
            input_rate: params.input_rate,
            output_rate: params.output_rate,
            reset_value: params.reset_value,
            slots: vec![params.reset_value; params.table_size as usize],
        }
    }

    fn lane(&self, port: Port, lane: u32, width: u32) -> u64 {
        self.pins
            .get(port)
            .and_then(|v| v.lane(lane, width))
            .unwrap_or(0)
    }

    fn read(&mut self) {
        if !self.pins.is_high(Port::RdEn) {
            return;
        }
        let values: Vec<u64> = (0..self.output_rate)
            .map(|lane| {
                let index = self.lane(Port::RdIndex, lane, self.index_width);
                let value = self.slots.get(index as usize).copied().unwrap_or(0);
                if lane == 0 {
                    self.defects.data(value)
                } else {
                    value
                }
            })
            .collect();
        let packed = SignalValue::pack_lanes(&values, self.data_width, self.output_rate);
        self.pins.drive_wide(Port::RdData, packed);
    }

    fn write(&mut self) {
        let mask = self.pins.read(Port::WrEn);
        for lane in 0..self.input_rate {
            if (mask >> lane) & 1 == 0 {
                continue;
            }
            let index = self.lane(Port::WrIndex, lane, self.index_width) as usize;
            let value = self.lane(Port::WrData, lane, self.data_width);
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = value;
            }
        }
    }
}

impl Dut for TableDut {
    fn kind(&self) -> StructureKind {
        StructureKind::Table
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
            let value = self.reset_value;
            self.slots.iter_mut().for_each(|s| *s = value);
            self.pins.drive(Port::RdData, 0);
            return;
        }
        self.read();
        self.write();
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{cycle, reset};
    use super::*;
    use rtlcheck_config::StructureConfig;

    fn table() -> TableDut {
        let params = TableParams::default();
        let layout = BusLayout::new(&StructureConfig::Table(params.clone()));
        let mut dut = TableDut::new(&layout, &params, DefectSet::default());
        reset(&mut dut);
        dut
    }

    fn poke(dut: &mut TableDut, port: Port, value: SignalValue) {
        dut.poke(port, value).unwrap();
    }

    fn access(dut: &mut TableDut, writes: &[(u64, u64)], reads: &[u64]) -> Vec<u64> {
        let idx: Vec<u64> = writes.iter().map(|w| w.0).collect();
        let val: Vec<u64> = writes.iter().map(|w| w.1).collect();
        poke(dut, Port::WrIndex, SignalValue::pack_lanes(&idx, 5, 2));
        poke(dut, Port::WrData, SignalValue::pack_lanes(&val, 8, 2));
        poke(
            dut,
            Port::WrEn,
            SignalValue::from_u64((1 << writes.len()) - 1, 2),
        );
        poke(dut, Port::RdIndex, SignalValue::pack_lanes(reads, 5, 2));
        poke(dut, Port::RdEn, SignalValue::from_bool(!reads.is_empty()));
        cycle(dut, 0);
        poke(dut, Port::WrEn, SignalValue::new(2));
        poke(dut, Port::RdEn, SignalValue::from_bool(false));
        let out = dut.pins.get(Port::RdData).unwrap();
        (0..2).map(|l| out.lane(l, 8).unwrap()).collect()
    }

    #[test]
    fn read_sees_value_before_write() {
        let mut dut = table();
        access(&mut dut, &[(4, 0x11)], &[]);
        let out = access(&mut dut, &[(4, 0x22)], &[4]);
        assert_eq!(out[0], 0x11);
        let out = access(&mut dut, &[], &[4, 0]);
        assert_eq!(out, vec![0x22, 0]);
    }

    #[test]
    fn highest_lane_wins() {
        let mut dut = table();
        access(&mut dut, &[(7, 1), (7, 2)], &[]);
        assert_eq!(dut.slots[7], 2);
    }

    #[test]
    fn reset_loads_reset_value() {
        let params = TableParams {
            reset_value: 0x5a,
            ..TableParams::default()
        };
        let layout = BusLayout::new(&StructureConfig::Table(params.clone()));
        let mut dut = TableDut::new(&layout, &params, DefectSet::default());
        reset(&mut dut);
        access(&mut dut, &[(3, 0x01)], &[]);
        let out = access(&mut dut, &[], &[3, 9]);
        assert_eq!(out, vec![0x01, 0x5a]);
    }
}
