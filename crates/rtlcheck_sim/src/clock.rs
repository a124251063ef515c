//! Free-running clocks and the edge events they produce.

use rtlcheck_common::{Edge, SimTime};
use rtlcheck_common::time::FS_PER_NS;

/// One clock edge delivered by the harness.
///
/// `index` is a total order over every edge of every clock; two clocks
/// toggling at the same instant produce two events, the earlier-declared
/// clock first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Position in the global edge order, starting at zero.
    pub index: u64,
    /// Simulation time of the edge.
    pub time: SimTime,
    /// Index of the clock in the design's clock list.
    pub clock: usize,
    /// Edge direction.
    pub edge: Edge,
}

/// A square-wave clock that starts low and toggles every half period.
#[derive(Clone, Debug)]
pub struct Clock {
    name: &'static str,
    half_period_fs: u64,
    next_toggle: SimTime,
    level: bool,
    rising_edges: u64,
}

impl Clock {
    /// Creates a clock with the given period.
    pub fn new(name: &'static str, period_ns: u64) -> Self {
        let half_period_fs = (period_ns * FS_PER_NS / 2).max(1);
        Self {
            name,
            half_period_fs,
            next_toggle: SimTime::from_fs(half_period_fs),
            level: false,
            rising_edges: 0,
        }
    }

    /// Clock name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Time of the next edge.
    pub fn next_toggle(&self) -> SimTime {
        self.next_toggle
    }

    /// Rising edges produced so far.
    pub fn rising_edges(&self) -> u64 {
        self.rising_edges
    }

    /// Toggles the clock and returns the edge produced.
    pub(crate) fn toggle(&mut self) -> Edge {
        self.level = !self.level;
        self.next_toggle = self.next_toggle.after(self.half_period_fs);
        if self.level {
            self.rising_edges += 1;
            Edge::Rising
        } else {
            Edge::Falling
        }
    }
}

/// Picks the clock that toggles next: earliest time, then declaration order.
pub(crate) fn next_clock(clocks: &[Clock]) -> Option<usize> {
    clocks
        .iter()
        .enumerate()
        .min_by_key(|(i, c)| (c.next_toggle, *i))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_low_and_rises_first() {
        let mut clk = Clock::new("clk", 10);
        assert!(!clk.level());
        assert_eq!(clk.next_toggle(), SimTime::from_ns(5));
        assert_eq!(clk.toggle(), Edge::Rising);
        assert_eq!(clk.next_toggle(), SimTime::from_ns(10));
        assert_eq!(clk.toggle(), Edge::Falling);
        assert_eq!(clk.rising_edges(), 1);
    }

    #[test]
    fn ties_go_to_first_clock() {
        let clocks = vec![Clock::new("wr_clk", 10), Clock::new("rd_clk", 10)];
        assert_eq!(next_clock(&clocks), Some(0));
    }

    #[test]
    fn faster_clock_wins() {
        let clocks = vec![Clock::new("wr_clk", 14), Clock::new("rd_clk", 10)];
        assert_eq!(next_clock(&clocks), Some(1));
        assert_eq!(next_clock(&[]), None);
    }
}
