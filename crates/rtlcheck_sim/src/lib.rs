//! Clocked simulation of data-structure designs.
//!
//! This crate provides:
//! - [`dut`]: cycle-level behavioural designs with injectable defects
//! - [`Harness`]: the clock scheduler that owns a design and delivers edges
//! - [`Driver`] and [`Monitor`]: the active and passive agents, both
//!   implementing [`Agent`]
//! - [`Protocol`] and [`AgentRole`]: how each structure starts, completes,
//!   and reports an operation
//! - [`VcdRecorder`]: optional VCD output of every port

#![warn(missing_docs)]

pub mod agent;
pub mod clock;
pub mod driver;
pub mod dut;
pub mod error;
pub mod harness;
mod inflight;
pub mod monitor;
pub mod pins;
pub mod protocol;
pub mod waveform;

pub use agent::{Agent, AgentPhase};
pub use clock::{Clock, EdgeEvent};
pub use driver::Driver;
pub use dut::{build_dut, DefectSet, Dut};
pub use error::SimError;
pub use harness::Harness;
pub use inflight::{Capture, Flags};
pub use monitor::Monitor;
pub use pins::PinBank;
pub use protocol::{AgentRole, Completion, EnableStyle, FaultSource, Protocol, Trigger};
pub use waveform::{TraceRecorder, VcdRecorder};
