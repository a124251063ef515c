//! Configuration types deserialized from `rtlcheck.toml`.

use rtlcheck_common::{bits_for, StructureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The top-level session configuration.
///
/// Built once before the first operation and shared by reference with every
/// component that needs widths, capacities, or timing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Session metadata and checking policy.
    pub session: SessionMeta,
    /// The design kind and its parameters.
    pub structure: StructureConfig,
    /// Behavioural design settings.
    #[serde(default)]
    pub dut: DutConfig,
    /// Clock periods by clock name.
    #[serde(default)]
    pub clocks: BTreeMap<String, ClockDef>,
    /// Random stimulus settings.
    #[serde(default)]
    pub stimulus: StimulusConfig,
}

impl SessionConfig {
    /// Returns the configured period of a clock, or the default for the structure.
    ///
    /// An asynchronous FIFO defaults its read clock to a period unrelated to the
    /// write clock so that completions interleave.
    pub fn clock_period_ns(&self, clock: &str) -> u64 {
        if let Some(def) = self.clocks.get(clock) {
            return def.period_ns;
        }
        match (&self.structure, clock) {
            (StructureConfig::Fifo(p), "rd_clk") if p.async_clocks => 14,
            _ => DEFAULT_CLOCK_PERIOD_NS,
        }
    }
}

/// Clock period used when a clock has no `[clocks.<name>]` entry.
pub const DEFAULT_CLOCK_PERIOD_NS: u64 = 10;

/// Core session metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionMeta {
    /// Session name, used in reports.
    pub name: String,
    /// Seed for random stimulus.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Maximum clock edges to wait for a completion handshake.
    #[serde(default = "default_timeout_cycles")]
    pub timeout_cycles: u32,
    /// Clock cycles reset is held at start-up and on explicit reset.
    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u32,
    /// Which agent feeds the scoreboard.
    #[serde(default)]
    pub check_source: CheckSource,
}

fn default_timeout_cycles() -> u32 {
    1000
}

fn default_reset_cycles() -> u32 {
    3
}

/// The agent whose transactions are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSource {
    /// The passive monitor (default).
    #[default]
    Monitor,
    /// The driver's own completion records.
    Driver,
}

/// Settings for the built-in behavioural design.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DutConfig {
    /// Clock cycles between sampling a start and asserting done.
    #[serde(default = "default_latency")]
    pub latency: u32,
    /// Defects injected into the design.
    #[serde(default)]
    pub defects: Vec<Defect>,
    /// Path of a VCD trace to write.
    #[serde(default)]
    pub vcd: Option<String>,
}

fn default_latency() -> u32 {
    2
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            latency: default_latency(),
            defects: Vec::new(),
            vcd: None,
        }
    }
}

/// A deliberate bug the behavioural design can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Defect {
    /// The fault output never asserts; full/empty flags never assert.
    DropFault,
    /// Read data has its least significant bit inverted.
    CorruptData,
    /// The done handshake never asserts.
    NeverDone,
    /// The structure reports full one element early and refuses that element.
    EarlyFull,
    /// Status outputs (length, pointers, flags, collision count) stay unknown.
    UndrivenStatus,
}

impl Defect {
    /// Every defect, in declaration order.
    pub const ALL: [Defect; 5] = [
        Defect::DropFault,
        Defect::CorruptData,
        Defect::NeverDone,
        Defect::EarlyFull,
        Defect::UndrivenStatus,
    ];

    /// The snake_case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Defect::DropFault => "drop_fault",
            Defect::CorruptData => "corrupt_data",
            Defect::NeverDone => "never_done",
            Defect::EarlyFull => "early_full",
            Defect::UndrivenStatus => "undriven_status",
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Defect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().replace('-', "_");
        Defect::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown defect '{s}'"))
    }
}

/// A clock definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClockDef {
    /// Clock period in nanoseconds.
    pub period_ns: u64,
}

/// Random stimulus settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StimulusConfig {
    /// Number of random operations per run.
    #[serde(default = "default_operations")]
    pub operations: usize,
    /// Relative weight per operation name; missing names use built-in defaults.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

fn default_operations() -> usize {
    64
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            operations: default_operations(),
            weights: BTreeMap::new(),
        }
    }
}

/// The design kind, tagged by `kind`, with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureConfig {
    /// Singly-linked list.
    SinglyLinkedList(LinkedListParams),
    /// Doubly-linked list.
    DoublyLinkedList(LinkedListParams),
    /// FIFO queue.
    Fifo(FifoParams),
    /// LIFO stack.
    Lifo(LifoParams),
    /// Hash table.
    HashTable(HashTableParams),
    /// Indexable list.
    List(ListParams),
    /// Register table.
    Table(TableParams),
    /// Dual-edge flip-flop.
    DualEdgeFf(DualEdgeParams),
}

impl StructureConfig {
    /// Returns the structure kind.
    pub fn kind(&self) -> StructureKind {
        match self {
            StructureConfig::SinglyLinkedList(_) => StructureKind::SinglyLinkedList,
            StructureConfig::DoublyLinkedList(_) => StructureKind::DoublyLinkedList,
            StructureConfig::Fifo(_) => StructureKind::Fifo,
            StructureConfig::Lifo(_) => StructureKind::Lifo,
            StructureConfig::HashTable(_) => StructureKind::HashTable,
            StructureConfig::List(_) => StructureKind::List,
            StructureConfig::Table(_) => StructureKind::Table,
            StructureConfig::DualEdgeFf(_) => StructureKind::DualEdgeFf,
        }
    }

    /// Returns the declared element capacity, if the structure has one.
    pub fn capacity(&self) -> Option<u64> {
        match self {
            StructureConfig::SinglyLinkedList(p) | StructureConfig::DoublyLinkedList(p) => {
                Some(p.max_node)
            }
            StructureConfig::Fifo(p) => Some(p.depth),
            StructureConfig::Lifo(p) => Some(p.depth),
            StructureConfig::HashTable(p) => Some(p.capacity()),
            StructureConfig::List(p) => Some(p.length),
            StructureConfig::Table(p) => Some(p.table_size),
            StructureConfig::DualEdgeFf(_) => None,
        }
    }

    /// Returns the width of stored values.
    pub fn data_width(&self) -> u32 {
        match self {
            StructureConfig::SinglyLinkedList(p) | StructureConfig::DoublyLinkedList(p) => {
                p.data_width
            }
            StructureConfig::Fifo(p) => p.data_width,
            StructureConfig::Lifo(p) => p.data_width,
            StructureConfig::HashTable(p) => p.value_width,
            StructureConfig::List(p) => p.data_width,
            StructureConfig::Table(p) => p.data_width,
            StructureConfig::DualEdgeFf(p) => p.data_width,
        }
    }
}

/// Linked-list parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkedListParams {
    /// Width of node values.
    pub data_width: u32,
    /// Maximum number of nodes; also the null address.
    pub max_node: u64,
}

impl Default for LinkedListParams {
    fn default() -> Self {
        Self {
            data_width: 8,
            max_node: 8,
        }
    }
}

impl LinkedListParams {
    /// The address reported for "no node".
    pub fn null_addr(&self) -> u64 {
        self.max_node
    }

    /// Width of the address and length buses.
    pub fn addr_width(&self) -> u32 {
        bits_for(self.max_node)
    }
}

/// FIFO parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FifoParams {
    /// Number of entries.
    pub depth: u64,
    /// Width of stored values.
    pub data_width: u32,
    /// Whether the write and read clocks are independent.
    pub async_clocks: bool,
    /// Whether read data passes through an extra output register.
    pub rd_buffer: bool,
}

impl Default for FifoParams {
    fn default() -> Self {
        Self {
            depth: 12,
            data_width: 8,
            async_clocks: true,
            rd_buffer: true,
        }
    }
}

/// LIFO parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LifoParams {
    /// Number of entries.
    pub depth: u64,
    /// Width of stored values.
    pub data_width: u32,
}

impl Default for LifoParams {
    fn default() -> Self {
        Self {
            depth: 12,
            data_width: 8,
        }
    }
}

/// Hash table parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HashTableParams {
    /// Width of keys.
    pub key_width: u32,
    /// Width of values.
    pub value_width: u32,
    /// Number of buckets.
    pub total_index: u64,
    /// Entries per bucket with chaining.
    pub chaining_size: u64,
    /// How colliding keys are stored.
    pub collision_method: CollisionMethod,
    /// How keys map to buckets.
    pub hash_algorithm: HashAlgorithm,
}

impl Default for HashTableParams {
    fn default() -> Self {
        Self {
            key_width: 32,
            value_width: 32,
            total_index: 8,
            chaining_size: 4,
            collision_method: CollisionMethod::MultiStageChaining,
            hash_algorithm: HashAlgorithm::Modulus,
        }
    }
}

impl HashTableParams {
    /// Total number of keys the table can hold.
    pub fn capacity(&self) -> u64 {
        match self.collision_method {
            CollisionMethod::MultiStageChaining => {
                self.total_index.saturating_mul(self.chaining_size)
            }
            CollisionMethod::LinearProbing => self.total_index,
        }
    }

    /// Home bucket of a key.
    pub fn bucket(&self, key: u64) -> u64 {
        self.hash_algorithm
            .bucket(key, self.key_width, self.total_index)
    }

    /// Width of the collision count output.
    pub fn collision_width(&self) -> u32 {
        match self.collision_method {
            CollisionMethod::MultiStageChaining => bits_for(self.chaining_size),
            CollisionMethod::LinearProbing => bits_for(self.total_index),
        }
    }
}

/// Strategy for keys that hash to the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMethod {
    /// Each bucket holds up to `chaining_size` entries.
    MultiStageChaining,
    /// One entry per bucket, probing subsequent buckets on collision.
    LinearProbing,
}

/// Key-to-bucket hash function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// `key % total_index`.
    Modulus,
    /// 32-bit FNV-1a over the key's little-endian bytes, then modulo.
    Fnv1a,
}

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

impl HashAlgorithm {
    /// Maps a key to a bucket in `0..buckets`.
    pub fn bucket(self, key: u64, key_width: u32, buckets: u64) -> u64 {
        let buckets = buckets.max(1);
        match self {
            HashAlgorithm::Modulus => key % buckets,
            HashAlgorithm::Fnv1a => {
                let bytes = key_width.div_ceil(8).clamp(1, 8) as usize;
                let hash = key.to_le_bytes()[..bytes]
                    .iter()
                    .fold(FNV_OFFSET_BASIS, |h, b| {
                        (h ^ u32::from(*b)).wrapping_mul(FNV_PRIME)
                    });
                u64::from(hash) % buckets
            }
        }
    }
}

/// Indexable list parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListParams {
    /// Width of elements.
    pub data_width: u32,
    /// Maximum number of elements.
    pub length: u64,
    /// Summation circuit, which only changes latency.
    pub sum_method: SumMethod,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            data_width: 8,
            length: 8,
            sum_method: SumMethod::Parallel,
        }
    }
}

impl ListParams {
    /// Width of the index and length buses.
    pub fn index_width(&self) -> u32 {
        bits_for(self.length)
    }

    /// Width of the data output, wide enough for a full-list sum.
    pub fn out_width(&self) -> u32 {
        self.index_width() + self.data_width
    }
}

/// Summation circuit of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SumMethod {
    /// Single-cycle combinational sum.
    Parallel,
    /// One element per cycle.
    Sequential,
    /// Pipelined adder tree.
    AdderTree,
}

/// Register table parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableParams {
    /// Number of slots.
    pub table_size: u64,
    /// Width of each slot.
    pub data_width: u32,
    /// Write lanes per cycle.
    pub input_rate: u32,
    /// Read lanes per cycle.
    pub output_rate: u32,
    /// Value of every slot after reset.
    pub reset_value: u64,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            table_size: 32,
            data_width: 8,
            input_rate: 2,
            output_rate: 2,
            reset_value: 0,
        }
    }
}

impl TableParams {
    /// Width of one index lane.
    pub fn index_width(&self) -> u32 {
        bits_for(self.table_size.saturating_sub(1))
    }
}

/// Dual-edge flip-flop parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DualEdgeParams {
    /// Width of the register.
    pub data_width: u32,
    /// Value after reset.
    pub reset_value: u64,
}

impl Default for DualEdgeParams {
    fn default() -> Self {
        Self {
            data_width: 8,
            reset_value: 0,
        }
    }
}
