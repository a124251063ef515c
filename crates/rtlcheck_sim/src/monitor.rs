//! The passive agent: reconstructs operations from sampled ports.
//!
//! A monitor never drives the design. It decodes the inputs the design
//! sampled at each acting edge, following the same completion rules as the
//! driver, so its transactions depend only on what happened on the bus.

use crate::agent::Agent;
use crate::clock::EdgeEvent;
use crate::error::SimError;
use crate::harness::Harness;
use crate::inflight::{Capture, Flags, InFlight};
use crate::protocol::{AgentRole, Protocol, Trigger};
use rtlcheck_codec::{Codec, Port, PortSample};

/// Observes one role of a design.
pub struct Monitor {
    role: AgentRole,
    codec: Codec,
    timeout: u32,
    read_buffer: bool,
    trigger: Trigger,
    flight: Option<InFlight>,
    prev_start: bool,
    flags: Flags,
}

impl Monitor {
    /// Creates a monitor for one role of the codec's design.
    pub fn new(role: AgentRole, codec: Codec, timeout: u32, read_buffer: bool) -> Self {
        let trigger = Protocol::trigger(codec.layout().kind);
        Self {
            role,
            codec,
            timeout,
            read_buffer,
            trigger,
            flight: None,
            prev_start: false,
            flags: Flags::default(),
        }
    }

    fn sample(&self, harness: &Harness) -> PortSample {
        let mut sample = harness.sample_inputs();
        if let Some(owned) = &self.role.inputs {
            sample.retain(|port, _| owned.contains(port));
        }
        sample
    }

    fn handle(
        &mut self,
        harness: &Harness,
        event: &EdgeEvent,
        pre: Flags,
    ) -> Result<Vec<Capture>, SimError> {
        if harness.is_reset_asserted() {
            self.flight = None;
            self.prev_start = false;
            return Ok(Vec::new());
        }
        if !self.role.acts_on(event.clock, event.edge) {
            return Ok(Vec::new());
        }

        let mut captures = Vec::new();
        if let Some(flight) = self.flight.as_mut() {
            if let Some(capture) = flight.step(harness, self.timeout)? {
                captures.push(capture);
                self.flight = None;
            }
        }

        let sample = self.sample(harness);
        let start = sample.get(&Port::Start).is_some_and(|v| v.is_high());
        if self.flight.is_none() {
            let op = self.codec.decode(&sample, event.edge);
            let triggered = match self.trigger {
                Trigger::StartRise => start && !self.prev_start,
                Trigger::EnableLevel => !op.is_idle(),
                Trigger::EveryEdge => true,
            };
            if triggered && !op.is_idle() && self.role.carries(op.kind()) {
                tracing::trace!(agent = self.role.name, %op, time = %event.time, "observed");
                let protocol = Protocol::for_op(harness.kind(), &op, self.read_buffer);
                let lane_width = self.codec.layout().data_width;
                let mut flight = InFlight::new(op, protocol, event, pre, lane_width);
                match flight.step(harness, self.timeout)? {
                    Some(capture) => captures.push(capture),
                    None => self.flight = Some(flight),
                }
            }
        }
        self.prev_start = start;
        Ok(captures)
    }
}

impl Agent for Monitor {
    fn name(&self) -> &str {
        self.role.name
    }

    fn role(&self) -> &AgentRole {
        &self.role
    }

    fn on_event(
        &mut self,
        harness: &mut Harness,
        event: &EdgeEvent,
    ) -> Result<Vec<Capture>, SimError> {
        let pre = self.flags;
        let captures = self.handle(harness, event, pre)?;
        self.flags = Flags::read(harness);
        Ok(captures)
    }

    fn in_flight_since(&self) -> Option<u64> {
        self.flight.as_ref().map(|f| f.sampled_at())
    }

    fn is_quiet(&self) -> bool {
        self.flight.is_none()
    }

    fn abort(&mut self, harness: &Harness) {
        self.flight = None;
        self.prev_start = false;
        self.flags = Flags::read(harness);
    }
}
