//! Hash table model with chaining or linear probing.
//!
//! | operation | condition | fault | effect |
//! |---|---|---|---|
//! | `Insert(k, v)` | `k` present | no | value updated in place |
//! | | home bucket full (chaining) or no free slot (probing) | yes | none |
//! | | otherwise | no | entry added |
//! | `DeleteKey(k)` | `k` absent | yes | none |
//! | `Search(k)` | `k` absent | yes | none |
//! | | present | no | stored value |
//!
//! The collision count reported after each operation is the number of other
//! keys examined while resolving it: the other occupants of the home bucket
//! with chaining, or the occupied non-matching slots probed with linear
//! probing.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::{CollisionMethod, HashTableParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Empty,
    Deleted,
    Used { key: u64, value: u64 },
}

#[derive(Clone, Debug)]
enum Storage {
    Chained(Vec<Vec<(u64, u64)>>),
    Probed(Vec<Slot>),
}

/// Where a key lives, or would live.
struct Lookup {
    /// Bucket or slot holding the key.
    found: Option<(usize, usize)>,
    /// Where a new key would be placed.
    free: Option<(usize, usize)>,
    collisions: u64,
}

/// Reference model of a hash table.
#[derive(Clone, Debug)]
pub struct HashTableModel {
    params: HashTableParams,
    key_mask: u64,
    value_mask: u64,
    storage: Storage,
    last_collisions: u64,
}

impl HashTableModel {
    /// Creates an empty table.
    pub fn new(params: &HashTableParams) -> Self {
        Self {
            params: params.clone(),
            key_mask: value_mask(params.key_width),
            value_mask: value_mask(params.value_width),
            storage: Self::empty_storage(params),
            last_collisions: 0,
        }
    }

    fn empty_storage(params: &HashTableParams) -> Storage {
        let buckets = params.total_index as usize;
        match params.collision_method {
            CollisionMethod::MultiStageChaining => Storage::Chained(vec![Vec::new(); buckets]),
            CollisionMethod::LinearProbing => Storage::Probed(vec![Slot::Empty; buckets]),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Chained(buckets) => buckets.iter().map(Vec::len).sum(),
            Storage::Probed(slots) => slots
                .iter()
                .filter(|s| matches!(s, Slot::Used { .. }))
                .count(),
        }
    }

    /// Returns true when no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: u64) -> Lookup {
        let home = self.params.bucket(key) as usize;
        match &self.storage {
            Storage::Chained(buckets) => {
                let bucket = &buckets[home];
                let found = bucket.iter().position(|(k, _)| *k == key);
                let others = bucket.len() - usize::from(found.is_some());
                let has_room = (bucket.len() as u64) < self.params.chaining_size;
                Lookup {
                    found: found.map(|p| (home, p)),
                    free: has_room.then_some((home, bucket.len())),
                    collisions: others as u64,
                }
            }
            Storage::Probed(slots) => {
                let n = slots.len();
                let mut lookup = Lookup {
                    found: None,
                    free: None,
                    collisions: 0,
                };
                for step in 0..n {
                    let idx = (home + step) % n;
                    match slots[idx] {
                        Slot::Used { key: k, .. } if k == key => {
                            lookup.found = Some((idx, 0));
                            break;
                        }
                        Slot::Used { .. } => lookup.collisions += 1,
                        Slot::Deleted => {
                            lookup.free.get_or_insert((idx, 0));
                        }
                        Slot::Empty => {
                            lookup.free.get_or_insert((idx, 0));
                            break;
                        }
                    }
                }
                lookup
            }
        }
    }

    fn insert(&mut self, key: u64, value: u64) -> Response {
        let lookup = self.lookup(key);
        self.last_collisions = lookup.collisions;
        let target = match (lookup.found, lookup.free) {
            (Some(at), _) | (None, Some(at)) => at,
            (None, None) => return Response::fault(),
        };
        match &mut self.storage {
            Storage::Chained(buckets) => {
                let bucket = &mut buckets[target.0];
                match bucket.get_mut(target.1) {
                    Some(entry) => entry.1 = value,
                    None => bucket.push((key, value)),
                }
            }
            Storage::Probed(slots) => slots[target.0] = Slot::Used { key, value },
        }
        Response::ok()
    }

    fn delete(&mut self, key: u64) -> Response {
        let lookup = self.lookup(key);
        self.last_collisions = lookup.collisions;
        let Some((bucket, pos)) = lookup.found else {
            return Response::fault();
        };
        match &mut self.storage {
            Storage::Chained(buckets) => {
                buckets[bucket].remove(pos);
            }
            Storage::Probed(slots) => slots[bucket] = Slot::Deleted,
        }
        Response::ok()
    }

    fn search(&mut self, key: u64) -> Response {
        let lookup = self.lookup(key);
        self.last_collisions = lookup.collisions;
        let Some((bucket, pos)) = lookup.found else {
            return Response::fault();
        };
        let value = match &self.storage {
            Storage::Chained(buckets) => buckets[bucket][pos].1,
            Storage::Probed(slots) => match slots[bucket] {
                Slot::Used { value, .. } => value,
                Slot::Empty | Slot::Deleted => return Response::fault(),
            },
        };
        Response::value(value)
    }
}

impl ReferenceModel for HashTableModel {
    fn kind(&self) -> StructureKind {
        StructureKind::HashTable
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::Insert { key, value } => {
                self.insert(key & self.key_mask, value & self.value_mask)
            }
            Operation::DeleteKey { key } => self.delete(key & self.key_mask),
            Operation::Search { key } => self.search(key & self.key_mask),
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::HashTable, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status {
            length: Some(self.len() as u64),
            collision_count: Some(self.last_collisions),
            ..Status::default()
        }
    }

    fn reset(&mut self) {
        self.storage = Self::empty_storage(&self.params);
        self.last_collisions = 0;
    }
}
