//! Simulation time with femtosecond resolution.
//!
//! The verification harness only advances at clock edges, so unlike an
//! event-driven HDL kernel there are no delta cycles: a [`SimTime`] is a
//! plain femtosecond timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;

/// A point in simulated time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Time in femtoseconds.
    pub fs: u64,
}

impl SimTime {
    /// Time zero.
    pub fn zero() -> Self {
        Self { fs: 0 }
    }

    /// Creates a time from nanoseconds.
    pub fn from_ns(ns: u64) -> Self {
        Self {
            fs: ns.saturating_mul(FS_PER_NS),
        }
    }

    /// Creates a time from picoseconds.
    pub fn from_ps(ps: u64) -> Self {
        Self {
            fs: ps.saturating_mul(FS_PER_PS),
        }
    }

    /// Creates a time from femtoseconds.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Returns this time advanced by `fs` femtoseconds.
    pub fn after(self, fs: u64) -> Self {
        Self {
            fs: self.fs.saturating_add(fs),
        }
    }

    /// Converts to nanoseconds (truncated).
    pub fn to_ns(self) -> u64 {
        self.fs / FS_PER_NS
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            write!(f, "0 ns")
        } else if fs % FS_PER_US == 0 {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs % FS_PER_NS == 0 {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs % FS_PER_PS == 0 {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(SimTime::from_ns(10).fs, 10_000_000);
        assert_eq!(SimTime::from_ps(500).fs, 500_000);
        assert_eq!(SimTime::from_fs(1_500_000).to_ns(), 1);
    }

    #[test]
    fn after_adds() {
        let t = SimTime::from_ns(5).after(FS_PER_NS);
        assert_eq!(t, SimTime::from_ns(6));
    }

    #[test]
    fn ordering() {
        assert!(SimTime::from_ns(1) < SimTime::from_ns(2));
        assert_eq!(SimTime::default(), SimTime::zero());
    }

    #[test]
    fn display_units() {
        assert_eq!(SimTime::zero().to_string(), "0 ns");
        assert_eq!(SimTime::from_ns(15).to_string(), "15 ns");
        assert_eq!(SimTime::from_ns(3000).to_string(), "3 us");
        assert_eq!(SimTime::from_ps(2500).to_string(), "2500 ps");
        assert_eq!(SimTime::from_fs(7).to_string(), "7 fs");
    }
}
