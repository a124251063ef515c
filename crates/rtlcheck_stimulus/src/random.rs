//! Weighted random operation generation.
//!
//! Every field is drawn from the range its bus can carry, so generated
//! operations always encode; whether the design should accept them is left
//! to the reference model. Values and keys are often reused from recent
//! operations so that deletes, searches, and finds hit stored entries.

use crate::error::StimulusError;
use crate::weights::resolve_weights;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtlcheck_codec::BusLayout;
use rtlcheck_common::{Edge, LaneWrite, OpKind, Operation, StructureKind};
use rtlcheck_config::SessionConfig;
use std::collections::BTreeMap;

/// Seed used when the session does not name one.
pub const DEFAULT_SEED: u64 = 1;

/// Number of recent values and keys remembered for reuse.
const RECENT: usize = 16;

/// Chance, in percent, that a lookup reuses a remembered value or key.
const REUSE_PERCENT: u32 = 75;

/// Chance, in percent, that an insert reuses a remembered key.
const UPDATE_PERCENT: u32 = 30;

/// Produces a reproducible stream of operations for one structure.
pub struct RandomGenerator {
    layout: BusLayout,
    rng: StdRng,
    kinds: Vec<OpKind>,
    dist: WeightedIndex<u32>,
    values: Vec<u64>,
    keys: Vec<u64>,
}

impl RandomGenerator {
    /// Creates a generator for `layout` with configured weight overrides.
    pub fn new(
        layout: BusLayout,
        seed: u64,
        overrides: &BTreeMap<String, u32>,
    ) -> Result<Self, StimulusError> {
        let (kinds, weights): (Vec<OpKind>, Vec<u32>) =
            resolve_weights(layout.kind, overrides)?.into_iter().unzip();
        let dist = WeightedIndex::new(&weights)
            .map_err(|_| StimulusError::NoEnabledOperations(layout.kind))?;
        tracing::debug!(kind = %layout.kind, seed, ?kinds, "random generator ready");
        Ok(Self {
            layout,
            rng: StdRng::seed_from_u64(seed),
            kinds,
            dist,
            values: Vec::new(),
            keys: Vec::new(),
        })
    }

    /// Creates a generator from a session configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self, StimulusError> {
        Self::new(
            BusLayout::new(&config.structure),
            config.session.seed.unwrap_or(DEFAULT_SEED),
            &config.stimulus.weights,
        )
    }

    /// The structure generated for.
    pub fn kind(&self) -> StructureKind {
        self.layout.kind
    }

    /// Generates `count` operations.
    pub fn generate(&mut self, count: usize) -> Vec<Operation> {
        (0..count).map(|_| self.next_op()).collect()
    }

    /// Generates one operation.
    pub fn next_op(&mut self) -> Operation {
        let kind = self.kinds[self.dist.sample(&mut self.rng)];
        self.make(kind)
    }

    fn make(&mut self, kind: OpKind) -> Operation {
        match kind {
            OpKind::Read => Operation::Read {
                target: self.target(),
            },
            OpKind::InsertAtAddr => Operation::InsertAtAddr {
                addr: self.target(),
                value: self.fresh_value(),
            },
            OpKind::InsertAtIndex => Operation::InsertAtIndex {
                index: self.target(),
                value: self.fresh_value(),
            },
            OpKind::DeleteByValue => Operation::DeleteByValue {
                value: self.known_value(),
            },
            OpKind::DeleteAtAddr => Operation::DeleteAtAddr {
                addr: self.target(),
            },
            OpKind::DeleteAtIndex => Operation::DeleteAtIndex {
                index: self.target(),
            },
            OpKind::Push => Operation::Push {
                value: self.fresh_value(),
            },
            OpKind::Pop => Operation::Pop,
            OpKind::PushPop => Operation::PushPop {
                value: self.fresh_value(),
            },
            OpKind::Enqueue => Operation::Enqueue {
                value: self.fresh_value(),
            },
            OpKind::Dequeue => Operation::Dequeue,
            OpKind::Insert => Operation::Insert {
                key: self.key(UPDATE_PERCENT),
                value: self.fresh_value(),
            },
            OpKind::DeleteKey => Operation::DeleteKey {
                key: self.key(REUSE_PERCENT),
            },
            OpKind::Search => Operation::Search {
                key: self.key(REUSE_PERCENT),
            },
            OpKind::Sum => Operation::Sum,
            OpKind::SortAscending => Operation::SortAscending,
            OpKind::SortDescending => Operation::SortDescending,
            OpKind::FindFirst => Operation::FindFirst {
                value: self.known_value(),
            },
            OpKind::FindAll => Operation::FindAll {
                value: self.known_value(),
            },
            OpKind::WriteLanes => Operation::write_lanes(self.lane_writes()),
            OpKind::ReadLanes => Operation::read_lanes(self.lane_reads()),
            OpKind::ReadWriteLanes => Operation::TableAccess {
                writes: self.lane_writes(),
                reads: self.lane_reads(),
            },
            OpKind::EdgeLatch => {
                let max = BusLayout::max_for(self.layout.data_width);
                Operation::EdgeLatch {
                    edge: if self.rng.gen_bool(0.5) {
                        Edge::Rising
                    } else {
                        Edge::Falling
                    },
                    value: self.rng.gen_range(0..=max),
                    // A zero enable would be an idle edge.
                    enable: self.rng.gen_range(1..=max),
                }
            }
            OpKind::Idle => Operation::Idle,
        }
    }

    /// An address or index anywhere on the address bus, null included.
    fn target(&mut self) -> u64 {
        let max = self
            .layout
            .null_addr
            .unwrap_or_else(|| BusLayout::max_for(self.layout.addr_width));
        self.rng.gen_range(0..=max)
    }

    /// A table slot.
    fn slot(&mut self) -> u64 {
        let size = self.layout.capacity.unwrap_or(1).max(1);
        self.rng.gen_range(0..size)
    }

    fn fresh_value(&mut self) -> u64 {
        let value = self
            .rng
            .gen_range(0..=BusLayout::max_for(self.layout.data_width));
        remember(&mut self.values, value);
        value
    }

    fn known_value(&mut self) -> u64 {
        match reuse(&mut self.rng, &self.values, REUSE_PERCENT) {
            Some(value) => value,
            None => self
                .rng
                .gen_range(0..=BusLayout::max_for(self.layout.data_width)),
        }
    }

    /// A key, reusing a recent one with `percent` chance. Fresh keys come
    /// from a few times the table capacity so buckets fill up.
    fn key(&mut self, percent: u32) -> u64 {
        if let Some(key) = reuse(&mut self.rng, &self.keys, percent) {
            return key;
        }
        let max = BusLayout::max_for(self.layout.key_width);
        let spread = self
            .layout
            .capacity
            .map_or(max, |c| c.saturating_mul(4).min(max));
        let key = self.rng.gen_range(0..=spread);
        remember(&mut self.keys, key);
        key
    }

    fn lane_writes(&mut self) -> Vec<LaneWrite> {
        let lanes = self.rng.gen_range(1..=self.layout.input_lanes.max(1));
        (0..lanes)
            .map(|_| LaneWrite {
                index: self.slot(),
                value: self.fresh_value(),
            })
            .collect()
    }

    fn lane_reads(&mut self) -> Vec<u64> {
        let lanes = self.rng.gen_range(1..=self.layout.output_lanes.max(1));
        (0..lanes).map(|_| self.slot()).collect()
    }
}

impl Iterator for RandomGenerator {
    type Item = Operation;

    fn next(&mut self) -> Option<Operation> {
        Some(self.next_op())
    }
}

fn remember(pool: &mut Vec<u64>, value: u64) {
    if pool.len() == RECENT {
        pool.remove(0);
    }
    pool.push(value);
}

fn reuse(rng: &mut StdRng, pool: &[u64], percent: u32) -> Option<u64> {
    if pool.is_empty() || !rng.gen_ratio(percent, 100) {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}
