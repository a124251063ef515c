//! Operation sequences for rtlcheck runs.
//!
//! [`SequenceBuilder`] writes deterministic regression scripts.
//! [`RandomGenerator`] draws a reproducible weighted mix from a seed, with
//! every field kept inside the range its bus can carry.

#![warn(missing_docs)]

pub mod error;
pub mod random;
pub mod sequence;
pub mod weights;

pub use error::StimulusError;
pub use random::{RandomGenerator, DEFAULT_SEED};
pub use sequence::SequenceBuilder;
pub use weights::{default_weights, resolve_weights};
