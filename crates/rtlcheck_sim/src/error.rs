//! Harness and agent error types.
//!
//! Checker mismatches are not errors; they are data for the scoreboard.
//! [`SimError`] covers problems with driving the design itself.

use rtlcheck_codec::{CodecError, Port};
use rtlcheck_common::{Operation, SimTime};
use std::io;

/// Errors that can occur while driving or observing a design.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A completion handshake did not arrive within the configured bound.
    #[error("{op} did not complete within {cycles} cycles (at {time})")]
    Timeout {
        /// The operation that hung.
        op: Operation,
        /// Clock edges waited.
        cycles: u32,
        /// Simulation time when the wait was abandoned.
        time: SimTime,
    },

    /// The design has no such port.
    #[error("design has no {0} port")]
    UnknownPort(Port),

    /// A value of the wrong width was driven onto a port.
    #[error("{port} is {expected} bits wide, got a {actual}-bit value")]
    WidthMismatch {
        /// The port driven.
        port: Port,
        /// Width of the port.
        expected: u32,
        /// Width of the value.
        actual: u32,
    },

    /// An output port was driven from the testbench.
    #[error("{0} is a design output and cannot be driven")]
    NotAnInput(Port),

    /// The operation could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An I/O error occurred while writing a trace.
    #[error("trace I/O error: {0}")]
    TraceIo(#[from] io::Error),

    /// A trace change referenced a signal that was never registered.
    #[error("trace signal {0} was never registered")]
    UnregisteredTraceSignal(usize),
}
