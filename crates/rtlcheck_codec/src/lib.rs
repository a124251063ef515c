//! Operation encoder and decoder for rtlcheck.
//!
//! Maps symbolic [`Operation`](rtlcheck_common::Operation)s to the narrow
//! opcode alphabet and fixed-width buses of a design, and rebuilds
//! operations from sampled input ports for passive monitoring. Opcode
//! decoding is table-driven ([`opcode`]); enable-driven designs (FIFO,
//! LIFO, register table, dual-edge flip-flop) are encoded from their enable
//! patterns.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod layout;
pub mod opcode;
pub mod port;

pub use codec::{Codec, DriveFrame, PortSample};
pub use error::CodecError;
pub use layout::BusLayout;
pub use opcode::{opcode_table, Fields, OpcodeEntry, OpcodeTable};
pub use port::{Direction, Port, PortSpec};
