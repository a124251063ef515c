//! The clocked harness that owns a design and delivers its edges.
//!
//! A [`Harness`] advances time edge by edge across every clock of the
//! design. At each edge the design samples its inputs and updates its
//! registered outputs; agents run after [`Harness::step`] returns, so what
//! they drive is sampled at the following edge of the same clock.

use crate::clock::{next_clock, Clock, EdgeEvent};
use crate::dut::Dut;
use crate::error::SimError;
use crate::waveform::TraceRecorder;
use rtlcheck_codec::{Port, PortSample};
use rtlcheck_common::{SignalValue, SimTime, StructureKind};
use rtlcheck_config::SessionConfig;

struct Trace {
    recorder: Box<dyn TraceRecorder>,
    last: Vec<Option<SignalValue>>,
}

/// A design under test with its free-running clocks.
pub struct Harness {
    dut: Box<dyn Dut>,
    clocks: Vec<Clock>,
    time: SimTime,
    next_index: u64,
    trace: Option<Trace>,
}

impl Harness {
    /// Wraps a design, one period per clock in the design's clock order.
    /// Missing periods fall back to the first one given, or 10 ns.
    pub fn new(dut: Box<dyn Dut>, periods_ns: &[u64]) -> Self {
        let fallback = periods_ns.first().copied().unwrap_or(10);
        let clocks = dut
            .clocks()
            .iter()
            .enumerate()
            .map(|(i, name)| Clock::new(*name, periods_ns.get(i).copied().unwrap_or(fallback)))
            .collect();
        Self {
            dut,
            clocks,
            time: SimTime::zero(),
            next_index: 0,
            trace: None,
        }
    }

    /// Wraps a design with the clock periods of a session file.
    pub fn from_config(dut: Box<dyn Dut>, config: &SessionConfig) -> Self {
        let periods: Vec<u64> = dut
            .clocks()
            .iter()
            .map(|name| config.clock_period_ns(name))
            .collect();
        Self::new(dut, &periods)
    }

    /// Structure implemented by the design.
    pub fn kind(&self) -> StructureKind {
        self.dut.kind()
    }

    /// The design's clocks.
    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Time of the last edge delivered.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Number of edges delivered so far.
    pub fn edges(&self) -> u64 {
        self.next_index
    }

    /// Advances to the next clock edge and lets the design react to it.
    pub fn step(&mut self) -> Result<EdgeEvent, SimError> {
        let clock = next_clock(&self.clocks).unwrap_or(0);
        self.time = self.clocks[clock].next_toggle();
        let edge = self.clocks[clock].toggle();
        self.dut.clock_edge(clock, edge);
        let event = EdgeEvent {
            index: self.next_index,
            time: self.time,
            clock,
            edge,
        };
        self.next_index += 1;
        self.record()?;
        Ok(event)
    }

    /// Current value of a port.
    pub fn peek(&self, port: Port) -> Option<SignalValue> {
        self.dut.peek(port)
    }

    /// Drives an input port.
    pub fn poke(&mut self, port: Port, value: SignalValue) -> Result<(), SimError> {
        self.dut.poke(port, value)?;
        self.record()
    }

    /// Drives several input ports.
    pub fn apply(&mut self, values: &[(Port, SignalValue)]) -> Result<(), SimError> {
        for (port, value) in values {
            self.dut.poke(*port, *value)?;
        }
        self.record()
    }

    /// Returns true if the design has the port.
    pub fn has(&self, port: Port) -> bool {
        self.dut.pins().spec(port).is_some()
    }

    /// Every input port's current value.
    pub fn sample_inputs(&self) -> PortSample {
        self.dut.pins().inputs()
    }

    /// Returns true while reset is held.
    pub fn is_reset_asserted(&self) -> bool {
        self.dut.pins().is_high(Port::Reset)
    }

    /// Drives the reset input.
    pub fn set_reset(&mut self, asserted: bool) -> Result<(), SimError> {
        self.poke(Port::Reset, SignalValue::from_bool(asserted))
    }

    /// Holds reset until every clock has produced `cycles` rising edges,
    /// then releases it. Returns the edges delivered meanwhile.
    pub fn reset(&mut self, cycles: u32) -> Result<Vec<EdgeEvent>, SimError> {
        let cycles = u64::from(cycles.max(1));
        let targets: Vec<u64> = self
            .clocks
            .iter()
            .map(|c| c.rising_edges() + cycles)
            .collect();
        self.set_reset(true)?;
        let mut events = Vec::new();
        while self
            .clocks
            .iter()
            .zip(&targets)
            .any(|(c, t)| c.rising_edges() < *t)
        {
            events.push(self.step()?);
        }
        self.set_reset(false)?;
        tracing::debug!(edges = events.len(), time = %self.time, "reset released");
        Ok(events)
    }

    /// Starts recording every clock and port into a trace.
    pub fn attach_trace(&mut self, mut recorder: Box<dyn TraceRecorder>) -> Result<(), SimError> {
        recorder.begin_scope(self.dut.kind().name())?;
        for (id, clock) in self.clocks.iter().enumerate() {
            recorder.register_signal(id, clock.name(), 1)?;
        }
        let base = self.clocks.len();
        for (n, spec) in self.dut.pins().specs().iter().enumerate() {
            recorder.register_signal(base + n, spec.name, spec.width)?;
        }
        recorder.end_scope()?;
        let signals = base + self.dut.pins().specs().len();
        self.trace = Some(Trace {
            recorder,
            last: vec![None; signals],
        });
        self.record()
    }

    /// Flushes and detaches the trace, if one is attached.
    pub fn finish_trace(&mut self) -> Result<(), SimError> {
        match self.trace.take() {
            Some(mut trace) => trace.recorder.finalize(),
            None => Ok(()),
        }
    }

    fn record(&mut self) -> Result<(), SimError> {
        let Some(trace) = self.trace.as_mut() else {
            return Ok(());
        };
        let levels = self.clocks.iter().map(|c| SignalValue::from_bool(c.level()));
        let pins = self.dut.pins();
        let ports = pins.specs().iter().map(|s| {
            pins.get(s.port)
                .unwrap_or_else(|| SignalValue::unknown(s.width))
        });
        for (id, value) in levels.chain(ports).enumerate() {
            if trace.last[id] != Some(value) {
                trace.recorder.record_change(self.time.fs, id, &value)?;
                trace.last[id] = Some(value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dut::build_dut;
    use crate::waveform::VcdRecorder;
    use rtlcheck_codec::BusLayout;
    use rtlcheck_common::Edge;
    use rtlcheck_config::{FifoParams, LifoParams, StructureConfig};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn harness(config: StructureConfig, periods: &[u64]) -> Harness {
        let layout = BusLayout::new(&config);
        Harness::new(build_dut(&config, &layout, 1, &[]), periods)
    }

    #[test]
    fn single_clock_alternates_edges() {
        let mut h = harness(StructureConfig::Lifo(LifoParams::default()), &[10]);
        let a = h.step().unwrap();
        let b = h.step().unwrap();
        assert_eq!((a.index, a.edge, a.time), (0, Edge::Rising, SimTime::from_ns(5)));
        assert_eq!((b.index, b.edge, b.time), (1, Edge::Falling, SimTime::from_ns(10)));
        assert_eq!(h.edges(), 2);
    }

    #[test]
    fn two_clocks_interleave_by_time() {
        let mut h = harness(StructureConfig::Fifo(FifoParams::default()), &[10, 14]);
        let events: Vec<(usize, u64)> = (0..4)
            .map(|_| h.step().unwrap())
            .map(|e| (e.clock, e.time.to_ns()))
            .collect();
        assert_eq!(events, vec![(0, 5), (1, 7), (0, 10), (1, 14)]);
    }

    #[test]
    fn reset_covers_every_clock() {
        let mut h = harness(StructureConfig::Fifo(FifoParams::default()), &[10, 30]);
        h.reset(2).unwrap();
        assert!(h.clocks().iter().all(|c| c.rising_edges() >= 2));
        assert!(!h.is_reset_asserted());
        assert_eq!(h.peek(Port::Empty), Some(SignalValue::from_bool(true)));
    }

    #[test]
    fn poke_reaches_design() {
        let mut h = harness(StructureConfig::Lifo(LifoParams::default()), &[10]);
        h.reset(1).unwrap();
        h.apply(&[
            (Port::WrEn, SignalValue::from_bool(true)),
            (Port::WrData, SignalValue::from_u64(9, 8)),
        ])
        .unwrap();
        assert!(h.sample_inputs()[&Port::WrEn].is_high());
        while h.step().unwrap().edge != Edge::Rising {}
        assert_eq!(h.peek(Port::Empty), Some(SignalValue::from_bool(false)));
        assert!(h.poke(Port::Full, SignalValue::from_bool(true)).is_err());
    }

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn trace_records_clocks_and_ports() {
        let buf = Shared::default();
        let mut h = harness(StructureConfig::Lifo(LifoParams::default()), &[10]);
        h.attach_trace(Box::new(VcdRecorder::new(buf.clone())))
            .unwrap();
        h.reset(1).unwrap();
        h.finish_trace().unwrap();
        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("$scope module lifo $end"));
        assert!(out.contains("$var wire 1 ! clk $end"));
        assert!(out.contains("lifo_empty"));
        assert!(out.contains("#5000000"));
    }
}
