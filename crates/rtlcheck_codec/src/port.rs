//! Port roles and the per-structure port set.
//!
//! Components refer to design signals by [`Port`] role rather than by name;
//! the hardware name of each role lives in the structure's [`BusLayout`]
//! (see [`crate::layout`]).

use std::fmt;

/// The role a signal plays on a design interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Port {
    Reset,
    Start,
    Op,
    Addr,
    Key,
    DataIn,
    DataOut,
    Done,
    InProgress,
    Fault,
    PrevAddr,
    NextAddr,
    Length,
    Head,
    Tail,
    Full,
    Empty,
    CollisionCount,
    WrEn,
    WrIndex,
    WrData,
    RdEn,
    RdIndex,
    RdData,
    PosLatchEn,
    NegLatchEn,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Signal direction as seen from the design.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Driven by the testbench.
    Input,
    /// Driven by the design.
    Output,
}

/// One signal of a design interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSpec {
    /// Role.
    pub port: Port,
    /// Hardware signal name.
    pub name: &'static str,
    /// Width in bits.
    pub width: u32,
    /// Direction.
    pub direction: Direction,
}

impl PortSpec {
    /// An input port.
    pub fn input(port: Port, name: &'static str, width: u32) -> Self {
        Self {
            port,
            name,
            width,
            direction: Direction::Input,
        }
    }

    /// An output port.
    pub fn output(port: Port, name: &'static str, width: u32) -> Self {
        Self {
            port,
            name,
            width,
            direction: Direction::Output,
        }
    }
}
