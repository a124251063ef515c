//! Sequence generation errors.

use rtlcheck_codec::CodecError;
use rtlcheck_common::{OpKind, StructureKind};

/// Errors raised while building or generating operation sequences.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StimulusError {
    /// A weight names an operation that does not exist.
    #[error("unknown operation '{0}' in weights")]
    UnknownOperation(String),

    /// A weight names an operation the structure does not support.
    #[error("'{op}' is not an operation of {kind}")]
    UnsupportedOperation {
        /// The operation named.
        op: OpKind,
        /// The structure being generated for.
        kind: StructureKind,
    },

    /// Every operation has weight zero.
    #[error("no operation of {0} has a non-zero weight")]
    NoEnabledOperations(StructureKind),

    /// A scripted operation cannot be encoded for the design.
    #[error("operation {index}: {source}")]
    InvalidOperation {
        /// Position in the sequence.
        index: usize,
        /// Why encoding failed.
        #[source]
        source: CodecError,
    },
}
