//! Shared foundational types for the rtlcheck verification library.
//!
//! This crate provides the symbolic [`Operation`] alphabet, the immutable
//! [`Transaction`] record passed from agents to the scoreboard, the
//! [`StructureKind`] family, 4-state [`SignalValue`] bus words, and
//! [`SimTime`].

#![warn(missing_docs)]

pub mod kind;
pub mod op;
pub mod signal;
pub mod time;
pub mod txn;

pub use kind::StructureKind;
pub use op::{Edge, LaneWrite, OpKind, Operation, ParseOpKindError};
pub use signal::{width_mask, SignalValue, MAX_SIGNAL_WIDTH};
pub use time::SimTime;
pub use txn::{Response, Status, StatusField, Transaction};

/// Number of bits needed to represent `max_value`, at least one.
pub fn bits_for(max_value: u64) -> u32 {
    (64 - max_value.leading_zeros()).max(1)
}
