//! Scripted operation sequences for deterministic regressions.

use crate::error::StimulusError;
use rtlcheck_codec::Codec;
use rtlcheck_common::{Edge, LaneWrite, Operation};

/// Builds a fixed list of operations.
///
/// ```
/// use rtlcheck_stimulus::SequenceBuilder;
///
/// let ops = SequenceBuilder::new()
///     .insert_at_index(0, 3)
///     .insert_at_index(0, 0)
///     .read(1)
///     .build();
/// assert_eq!(ops.len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SequenceBuilder {
    ops: Vec<Operation>,
}

impl SequenceBuilder {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends any operation.
    pub fn op(mut self, op: Operation) -> Self {
        self.ops.push(op);
        self
    }

    /// Appends `count` copies of `op`.
    pub fn repeat(mut self, op: Operation, count: usize) -> Self {
        self.ops.extend(std::iter::repeat(op).take(count));
        self
    }

    /// Appends every operation of `ops`.
    pub fn extend(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.ops.extend(ops);
        self
    }

    /// Appends `cycles` idle operations.
    pub fn idle(self, cycles: usize) -> Self {
        self.repeat(Operation::Idle, cycles)
    }

    /// Reads an address or index.
    pub fn read(self, target: u64) -> Self {
        self.op(Operation::Read { target })
    }

    /// Inserts before the node at `addr`.
    pub fn insert_at_addr(self, addr: u64, value: u64) -> Self {
        self.op(Operation::InsertAtAddr { addr, value })
    }

    /// Inserts at a position.
    pub fn insert_at_index(self, index: u64, value: u64) -> Self {
        self.op(Operation::InsertAtIndex { index, value })
    }

    /// Deletes the first element holding `value`.
    pub fn delete_by_value(self, value: u64) -> Self {
        self.op(Operation::DeleteByValue { value })
    }

    /// Deletes the node at `addr`.
    pub fn delete_at_addr(self, addr: u64) -> Self {
        self.op(Operation::DeleteAtAddr { addr })
    }

    /// Deletes the element at a position.
    pub fn delete_at_index(self, index: u64) -> Self {
        self.op(Operation::DeleteAtIndex { index })
    }

    /// Enqueues each value in order.
    pub fn enqueue_all(self, values: impl IntoIterator<Item = u64>) -> Self {
        self.extend(values.into_iter().map(|value| Operation::Enqueue { value }))
    }

    /// Dequeues `count` times.
    pub fn dequeue(self, count: usize) -> Self {
        self.repeat(Operation::Dequeue, count)
    }

    /// Pushes each value in order.
    pub fn push_all(self, values: impl IntoIterator<Item = u64>) -> Self {
        self.extend(values.into_iter().map(|value| Operation::Push { value }))
    }

    /// Pops `count` times.
    pub fn pop(self, count: usize) -> Self {
        self.repeat(Operation::Pop, count)
    }

    /// Inserts or updates a key.
    pub fn insert(self, key: u64, value: u64) -> Self {
        self.op(Operation::Insert { key, value })
    }

    /// Removes a key.
    pub fn delete_key(self, key: u64) -> Self {
        self.op(Operation::DeleteKey { key })
    }

    /// Looks up a key.
    pub fn search(self, key: u64) -> Self {
        self.op(Operation::Search { key })
    }

    /// Writes one table slot.
    pub fn write_slot(self, index: u64, value: u64) -> Self {
        self.op(Operation::write_lanes(vec![LaneWrite { index, value }]))
    }

    /// Reads table slots, one per lane.
    pub fn read_slots(self, indices: Vec<u64>) -> Self {
        self.op(Operation::read_lanes(indices))
    }

    /// Latches `value` through `enable` on `edge`. A zero `enable` holds the
    /// output and is not recorded as a transaction.
    pub fn latch(self, edge: Edge, value: u64, enable: u64) -> Self {
        self.op(Operation::EdgeLatch {
            edge,
            value,
            enable,
        })
    }

    /// Number of operations so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Finishes the sequence.
    pub fn build(self) -> Vec<Operation> {
        self.ops
    }

    /// Finishes the sequence, rejecting operations the design cannot carry.
    pub fn build_for(self, codec: &Codec) -> Result<Vec<Operation>, StimulusError> {
        for (index, op) in self.ops.iter().enumerate() {
            codec
                .encode(op)
                .map_err(|source| StimulusError::InvalidOperation { index, source })?;
        }
        Ok(self.ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlcheck_codec::{BusLayout, CodecError};
    use rtlcheck_common::OpKind;
    use rtlcheck_config::{FifoParams, StructureConfig};

    fn fifo_codec() -> Codec {
        Codec::new(BusLayout::new(&StructureConfig::Fifo(FifoParams::default())))
    }

    #[test]
    fn builds_in_order() {
        let ops = SequenceBuilder::new()
            .enqueue_all([1, 2])
            .idle(2)
            .dequeue(1)
            .build();
        let kinds: Vec<OpKind> = ops.iter().map(Operation::kind).collect();
        assert_eq!(
            kinds,
            [
                OpKind::Enqueue,
                OpKind::Enqueue,
                OpKind::Idle,
                OpKind::Idle,
                OpKind::Dequeue
            ]
        );
    }

    #[test]
    fn build_for_accepts_valid_sequence() {
        let ops = SequenceBuilder::new()
            .enqueue_all(0..15)
            .dequeue(15)
            .build_for(&fifo_codec())
            .unwrap();
        assert_eq!(ops.len(), 30);
    }

    #[test]
    fn build_for_rejects_foreign_operation() {
        let err = SequenceBuilder::new()
            .enqueue_all([1])
            .pop(1)
            .build_for(&fifo_codec())
            .unwrap_err();
        assert!(matches!(
            err,
            StimulusError::InvalidOperation {
                index: 1,
                source: CodecError::Unsupported { .. }
            }
        ));
    }

    #[test]
    fn build_for_rejects_wide_value() {
        let err = SequenceBuilder::new()
            .enqueue_all([0x1ff])
            .build_for(&fifo_codec())
            .unwrap_err();
        assert!(matches!(
            err,
            StimulusError::InvalidOperation {
                index: 0,
                source: CodecError::ValueOutOfRange { .. }
            }
        ));
    }
}
