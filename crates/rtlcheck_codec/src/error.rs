//! Encoding errors.

use rtlcheck_common::{OpKind, StructureKind};

/// Errors raised when an operation cannot be placed on the design's buses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The operation is not in the structure's operation set.
    #[error("'{op}' is not an operation of {kind}")]
    Unsupported {
        /// The rejected operation kind.
        op: OpKind,
        /// The structure being encoded for.
        kind: StructureKind,
    },

    /// A field value does not fit its bus.
    #[error("{field} value {value:#x} does not fit in {width} bits")]
    ValueOutOfRange {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Width of the bus.
        width: u32,
    },

    /// More lanes were requested than the design provides.
    #[error("{count} {direction} lanes requested, design has {available}")]
    TooManyLanes {
        /// `"write"` or `"read"`.
        direction: &'static str,
        /// Lanes requested.
        count: usize,
        /// Lanes available.
        available: u32,
    },
}
