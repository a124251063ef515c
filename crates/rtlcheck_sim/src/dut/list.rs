//! Indexable list with sort, sum, and find.
//!
//! `FIND_ALL` streams one matching index per cycle with `done` high and
//! `op_in_progress` high on every beat but the last. Sorting and sequential
//! summation take one cycle per element.

use super::handshake::{Beat, Handshake};
use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::{ListParams, SumMethod};

const OP_READ: u64 = 0;
const OP_INSERT: u64 = 1;
const OP_FIND_ALL: u64 = 2;
const OP_FIND_FIRST: u64 = 3;
const OP_SUM: u64 = 4;
const OP_SORT_ASC: u64 = 5;
const OP_SORT_DESC: u64 = 6;
const OP_DELETE: u64 = 7;

/// Behavioural indexable list.
pub struct ListDut {
    pins: PinBank,
    defects: DefectSet,
    latency: u32,
    sum_method: SumMethod,
    mem: Vec<u64>,
    len: usize,
    handshake: Handshake,
}

impl ListDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(layout: &BusLayout, params: &ListParams, latency: u32, defects: DefectSet) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            latency,
            sum_method: params.sum_method,
            mem: vec![0; params.length as usize],
            len: 0,
            handshake: Handshake::default(),
        }
    }

    fn capacity(&self) -> usize {
        self.defects.capacity(self.mem.len() as u64) as usize
    }

    fn single(&self, fault: bool, out: Option<u64>) -> Vec<Beat> {
        let mut beat = vec![
            (Port::Fault, u64::from(fault)),
            (Port::InProgress, 0),
            (Port::Length, self.len as u64),
        ];
        if let Some(v) = out {
            beat.push((Port::DataOut, v));
        }
        vec![beat]
    }

    fn sum_cycles(&self) -> u32 {
        let n = self.len as u64;
        match self.sum_method {
            SumMethod::Parallel => 0,
            SumMethod::Sequential => n as u32,
            SumMethod::AdderTree => 64 - n.saturating_sub(1).leading_zeros(),
        }
    }

    /// Executes one operation and returns the extra cycles and output beats.
    fn execute(&mut self, op: u64, index: u64, data: u64) -> (u32, Vec<Beat>) {
        let live = usize::try_from(index).ok().filter(|i| *i < self.len);
        match op {
            OP_READ => match live {
                Some(i) => (0, self.single(false, Some(self.mem[i]))),
                None => (0, self.single(true, None)),
            },
            OP_INSERT => {
                if self.len >= self.capacity() || index >= self.mem.len() as u64 {
                    return (0, self.single(true, None));
                }
                let at = live.unwrap_or(self.len);
                self.mem.copy_within(at..self.len, at + 1);
                self.mem[at] = data;
                self.len += 1;
                (0, self.single(false, None))
            }
            OP_DELETE => match live {
                Some(i) => {
                    self.mem.copy_within(i + 1..self.len, i);
                    self.len -= 1;
                    (0, self.single(false, None))
                }
                None => (0, self.single(true, None)),
            },
            OP_FIND_FIRST => {
                let hit = self.mem[..self.len].iter().position(|v| *v == data);
                (0, self.single(hit.is_none(), hit.map(|i| i as u64)))
            }
            OP_FIND_ALL => {
                let hits: Vec<usize> = (0..self.len).filter(|i| self.mem[*i] == data).collect();
                if hits.is_empty() {
                    return (0, self.single(true, None));
                }
                let last = hits.len() - 1;
                let beats = hits
                    .iter()
                    .enumerate()
                    .map(|(n, i)| {
                        vec![
                            (Port::Fault, 0),
                            (Port::DataOut, *i as u64),
                            (Port::InProgress, u64::from(n != last)),
                            (Port::Length, self.len as u64),
                        ]
                    })
                    .collect();
                (0, beats)
            }
            OP_SUM => {
                let sum = self.mem[..self.len]
                    .iter()
                    .fold(0u64, |acc, v| acc.wrapping_add(*v));
                (self.sum_cycles(), self.single(false, Some(sum)))
            }
            OP_SORT_ASC | OP_SORT_DESC => {
                let items = &mut self.mem[..self.len];
                if op == OP_SORT_ASC {
                    items.sort_unstable();
                } else {
                    items.sort_unstable_by(|a, b| b.cmp(a));
                }
                (self.len as u32, self.single(false, None))
            }
            _ => (0, self.single(false, None)),
        }
    }

    fn reset(&mut self) {
        self.mem.iter_mut().for_each(|v| *v = 0);
        self.len = 0;
        self.handshake.clear();
        for port in [
            Port::Done,
            Port::Fault,
            Port::InProgress,
            Port::DataOut,
            Port::Length,
        ] {
            self.pins.drive(port, 0);
        }
    }
}

impl Dut for ListDut {
    fn kind(&self) -> StructureKind {
        StructureKind::List
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
            let index = self.pins.read(Port::Addr);
            let data = self.pins.read(Port::DataIn);
            let (extra, beats) = self.execute(op, index, data);
            self.handshake
                .begin(self.latency.saturating_add(extra), beats);
        }
        self.handshake.advance(&mut self.pins, self.defects);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{cycle, get, high, reset, set};
    use super::*;
    use rtlcheck_config::StructureConfig;

    fn list(params: ListParams) -> ListDut {
        let layout = BusLayout::new(&StructureConfig::List(params.clone()));
        let mut dut = ListDut::new(&layout, &params, 1, DefectSet::default());
        reset(&mut dut);
        dut
    }

    /// Runs one operation; returns the data beats seen and the final fault.
    fn run(dut: &mut ListDut, op: u64, index: u64, data: u64) -> (Vec<u64>, bool) {
        set(dut, Port::Op, op);
        set(dut, Port::Addr, index);
        set(dut, Port::DataIn, data);
        set(dut, Port::Start, 1);
        let mut beats = Vec::new();
        for _ in 0..64 {
            cycle(dut, 0);
            if high(dut, Port::Done) {
                beats.push(get(dut, Port::DataOut));
                if !high(dut, Port::InProgress) {
                    break;
                }
            }
        }
        set(dut, Port::Start, 0);
        cycle(dut, 0);
        (beats, high(dut, Port::Fault))
    }

    fn filled(values: &[u64]) -> ListDut {
        let mut dut = list(ListParams::default());
        for v in values {
            run(&mut dut, OP_INSERT, 7, *v);
        }
        dut
    }

    #[test]
    fn sum_and_sort() {
        let mut dut = filled(&[9, 200, 4, 255, 17]);
        let (out, fault) = run(&mut dut, OP_SUM, 0, 0);
        assert!(!fault);
        assert_eq!(out, vec![485]);
        run(&mut dut, OP_SORT_ASC, 0, 0);
        assert_eq!(&dut.mem[..5], &[4, 9, 17, 200, 255]);
        assert_eq!(get(&dut, Port::Length), 5);
    }

    #[test]
    fn find_all_streams_indices() {
        let mut dut = filled(&[1, 5, 2, 5, 5]);
        let (out, fault) = run(&mut dut, OP_FIND_ALL, 0, 5);
        assert!(!fault);
        assert_eq!(out, vec![1, 3, 4]);
    }

    #[test]
    fn find_all_miss_faults_in_one_beat() {
        let mut dut = filled(&[1, 2]);
        let (out, fault) = run(&mut dut, OP_FIND_ALL, 0, 9);
        assert!(fault);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn insert_boundaries() {
        let mut dut = filled(&[1, 2]);
        let (_, fault) = run(&mut dut, OP_INSERT, 8, 3);
        assert!(fault);
        let (_, fault) = run(&mut dut, OP_INSERT, 0, 3);
        assert!(!fault);
        assert_eq!(&dut.mem[..3], &[3, 1, 2]);
        let (_, fault) = run(&mut dut, OP_READ, 3, 0);
        assert!(fault);
    }

    #[test]
    fn delete_shifts_down() {
        let mut dut = filled(&[1, 2, 3]);
        run(&mut dut, OP_DELETE, 0, 0);
        assert_eq!(&dut.mem[..2], &[2, 3]);
        let (out, _) = run(&mut dut, OP_FIND_FIRST, 0, 3);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn sequential_sum_takes_longer() {
        let params = ListParams {
            sum_method: SumMethod::Sequential,
            ..ListParams::default()
        };
        let mut dut = list(params);
        for v in 0..4 {
            run(&mut dut, OP_INSERT, 7, v);
        }
        set(&mut dut, Port::Op, OP_SUM);
        set(&mut dut, Port::Start, 1);
        let mut cycles = 0;
        while !high(&dut, Port::Done) && cycles < 20 {
            cycle(&mut dut, 0);
            cycles += 1;
        }
        assert_eq!(cycles, 6);
    }
}
