//! Hash table over a flat slot array.
//!
//! With multi-stage chaining each bucket owns a stripe of `chaining_size`
//! consecutive slots; with linear probing every slot is its own bucket and a
//! lookup walks forward from the home slot. Deleted probing slots become
//! tombstones so later keys in the same run stay reachable.

use super::handshake::Handshake;
use super::{DefectSet, Dut, SINGLE_CLOCK};
use crate::pins::PinBank;
use rtlcheck_codec::{BusLayout, Port};
use rtlcheck_common::{Edge, StructureKind};
use rtlcheck_config::{CollisionMethod, HashTableParams};

const OP_INSERT: u64 = 0b00;
const OP_DELETE: u64 = 0b01;
const OP_SEARCH: u64 = 0b10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    Free,
    Tombstone,
    Held { key: u64, value: u64 },
}

struct Probe {
    found: Option<usize>,
    free: Option<usize>,
    collisions: u64,
    occupancy: u64,
}

/// Behavioural hash table.
pub struct HashTableDut {
    pins: PinBank,
    defects: DefectSet,
    latency: u32,
    params: HashTableParams,
    slots: Vec<Entry>,
    handshake: Handshake,
}

impl HashTableDut {
    /// Creates the design; it holds unknown outputs until reset.
    pub fn new(
        layout: &BusLayout,
        params: &HashTableParams,
        latency: u32,
        defects: DefectSet,
    ) -> Self {
        Self {
            pins: PinBank::new(layout),
            defects,
            latency,
            params: params.clone(),
            slots: vec![Entry::Free; params.capacity() as usize],
            handshake: Handshake::default(),
        }
    }

    /// Slots a key may occupy, in search order, and the capacity they share.
    fn candidates(&self, key: u64) -> (Vec<usize>, u64) {
        let home = self.params.bucket(key) as usize;
        match self.params.collision_method {
            CollisionMethod::MultiStageChaining => {
                let size = self.params.chaining_size as usize;
                ((home * size..(home + 1) * size).collect(), size as u64)
            }
            CollisionMethod::LinearProbing => {
                let n = self.slots.len();
                ((0..n).map(|step| (home + step) % n).collect(), n as u64)
            }
        }
    }

    fn probe(&self, key: u64) -> (Probe, u64) {
        let (order, capacity) = self.candidates(key);
        let mut probe = Probe {
            found: None,
            free: None,
            collisions: 0,
            occupancy: 0,
        };
        let chained = self.params.collision_method == CollisionMethod::MultiStageChaining;
        for idx in order {
            match self.slots[idx] {
                Entry::Held { key: k, .. } if k == key => {
                    probe.found = Some(idx);
                    if !chained {
                        break;
                    }
                }
                Entry::Held { .. } => probe.collisions += 1,
                Entry::Tombstone => {
                    probe.free.get_or_insert(idx);
                }
                Entry::Free => {
                    probe.free.get_or_insert(idx);
                    if !chained {
                        break;
                    }
                }
            }
        }
        probe.occupancy = if chained {
            probe.collisions + u64::from(probe.found.is_some())
        } else {
            self.slots
                .iter()
                .filter(|e| matches!(e, Entry::Held { .. }))
                .count() as u64
        };
        (probe, capacity)
    }

    /// Executes one operation and returns `(fault, value, collisions)`.
    fn execute(&mut self, op: u64, key: u64, value: u64) -> (bool, Option<u64>, u64) {
        let (probe, capacity) = self.probe(key);
        let collisions = probe.collisions;
        match op {
            OP_INSERT => {
                let target = match probe.found {
                    Some(idx) => Some(idx),
                    None if probe.occupancy < self.defects.capacity(capacity) => probe.free,
                    None => None,
                };
                match target {
                    Some(idx) => {
                        self.slots[idx] = Entry::Held { key, value };
                        (false, None, collisions)
                    }
                    None => (true, None, collisions),
                }
            }
            OP_DELETE => match probe.found {
                Some(idx) => {
                    self.slots[idx] = match self.params.collision_method {
                        CollisionMethod::MultiStageChaining => Entry::Free,
                        CollisionMethod::LinearProbing => Entry::Tombstone,
                    };
                    (false, None, collisions)
                }
                None => (true, None, collisions),
            },
            OP_SEARCH => match probe.found.map(|idx| self.slots[idx]) {
                Some(Entry::Held { value, .. }) => (false, Some(value), collisions),
                _ => (true, None, collisions),
            },
            _ => (false, None, 0),
        }
    }

    fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Entry::Free);
        self.handshake.clear();
        for port in [Port::Done, Port::Fault, Port::DataOut, Port::CollisionCount] {
            self.pins.drive(port, 0);
        }
    }
}

impl Dut for HashTableDut {
    fn kind(&self) -> StructureKind {
        StructureKind::HashTable
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
            let key = self.pins.read(Port::Key);
            let value = self.pins.read(Port::DataIn);
            let (fault, out, collisions) = self.execute(op, key, value);
            let mut beat = vec![
                (Port::Fault, u64::from(fault)),
                (Port::CollisionCount, collisions),
            ];
            if let Some(v) = out {
                beat.push((Port::DataOut, v));
            }
            self.handshake.begin(self.latency, vec![beat]);
        }
        self.handshake.advance(&mut self.pins, self.defects);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{cycle, get, high, reset, set};
    use super::*;
    use rtlcheck_config::StructureConfig;

    fn table(params: HashTableParams) -> HashTableDut {
        let layout = BusLayout::new(&StructureConfig::HashTable(params.clone()));
        let mut dut = HashTableDut::new(&layout, &params, 1, DefectSet::default());
        reset(&mut dut);
        dut
    }

    fn run(dut: &mut HashTableDut, op: u64, key: u64, value: u64) -> bool {
        set(dut, Port::Op, op);
        set(dut, Port::Key, key);
        set(dut, Port::DataIn, value);
        set(dut, Port::Start, 1);
        cycle(dut, 0);
        set(dut, Port::Start, 0);
        for _ in 0..10 {
            if high(dut, Port::Done) {
                break;
            }
            cycle(dut, 0);
        }
        high(dut, Port::Fault)
    }

    #[test]
    fn bucket_overflow_faults() {
        let mut dut = table(HashTableParams::default());
        for key in [3, 11, 19, 27] {
            assert!(!run(&mut dut, OP_INSERT, key, key * 10));
        }
        assert_eq!(get(&dut, Port::CollisionCount), 3);
        assert!(run(&mut dut, OP_INSERT, 35, 1));
        assert!(!run(&mut dut, OP_SEARCH, 19, 0));
        assert_eq!(get(&dut, Port::DataOut), 190);
    }

    #[test]
    fn delete_then_search_faults() {
        let mut dut = table(HashTableParams::default());
        run(&mut dut, OP_INSERT, 1, 5);
        assert!(!run(&mut dut, OP_DELETE, 1, 0));
        assert!(run(&mut dut, OP_SEARCH, 1, 0));
        assert!(run(&mut dut, OP_DELETE, 1, 0));
    }

    #[test]
    fn existing_key_updates() {
        let mut dut = table(HashTableParams::default());
        run(&mut dut, OP_INSERT, 4, 1);
        assert!(!run(&mut dut, OP_INSERT, 4, 2));
        run(&mut dut, OP_SEARCH, 4, 0);
        assert_eq!(get(&dut, Port::DataOut), 2);
    }

    #[test]
    fn probing_survives_tombstones() {
        let params = HashTableParams {
            collision_method: CollisionMethod::LinearProbing,
            ..HashTableParams::default()
        };
        let mut dut = table(params);
        run(&mut dut, OP_INSERT, 2, 20);
        run(&mut dut, OP_INSERT, 10, 100);
        run(&mut dut, OP_DELETE, 2, 0);
        assert!(!run(&mut dut, OP_SEARCH, 10, 0));
        assert_eq!(get(&dut, Port::DataOut), 100);
        assert_eq!(get(&dut, Port::CollisionCount), 0);
    }

    #[test]
    fn probing_fills_every_slot() {
        let params = HashTableParams {
            collision_method: CollisionMethod::LinearProbing,
            ..HashTableParams::default()
        };
        let mut dut = table(params);
        for key in 0..8 {
            assert!(!run(&mut dut, OP_INSERT, key * 8, key));
        }
        assert!(run(&mut dut, OP_INSERT, 64, 0));
        assert_eq!(get(&dut, Port::CollisionCount), 8);
    }
}
