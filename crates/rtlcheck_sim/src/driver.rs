//! The active agent: drives queued operations onto the design.

use crate::agent::{Agent, AgentPhase};
use crate::clock::EdgeEvent;
use crate::error::SimError;
use crate::harness::Harness;
use crate::inflight::{Capture, Flags, InFlight};
use crate::protocol::{AgentRole, EnableStyle, Protocol};
use rtlcheck_codec::{Codec, DriveFrame, Port};
use rtlcheck_common::{Operation, SignalValue};
use std::collections::VecDeque;

enum State {
    Idle,
    Asserting {
        operation: Operation,
        frame: DriveFrame,
        protocol: Protocol,
    },
    Busy {
        flight: InFlight,
        release: Vec<(Port, SignalValue)>,
    },
}

/// Drives one operation at a time and records how each completed.
///
/// An operation's inputs are driven after an acting edge and sampled at the
/// next one. Designs with a held start get one idle edge between operations
/// so that every start is seen as a new rise; pulsed designs take an
/// operation on every acting edge.
pub struct Driver {
    role: AgentRole,
    codec: Codec,
    timeout: u32,
    read_buffer: bool,
    queue: VecDeque<Operation>,
    state: State,
    flags: Flags,
}

impl Driver {
    /// Creates a driver for one role of the codec's design.
    pub fn new(role: AgentRole, codec: Codec, timeout: u32, read_buffer: bool) -> Self {
        Self {
            role,
            codec,
            timeout,
            read_buffer,
            queue: VecDeque::new(),
            state: State::Idle,
            flags: Flags::default(),
        }
    }

    /// Queues an operation.
    pub fn push(&mut self, op: Operation) {
        self.queue.push_back(op);
    }

    /// Queues several operations.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Operation>) {
        self.queue.extend(ops);
    }

    /// Operations not yet started.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Current phase.
    pub fn phase(&self) -> AgentPhase {
        match &self.state {
            State::Idle => AgentPhase::Idle,
            State::Asserting { .. } => AgentPhase::Asserting,
            State::Busy { flight, .. } if flight.is_capturing() => AgentPhase::Capturing,
            State::Busy { .. } => AgentPhase::WaitingDone,
        }
    }

    /// Drives the next queued operation, if any, for sampling at the next
    /// acting edge.
    fn start_next(&mut self, harness: &mut Harness, event: &EdgeEvent) -> Result<(), SimError> {
        let Some(op) = self.queue.pop_front() else {
            return Ok(());
        };
        if op.is_idle() || is_hold(&op) {
            return Ok(());
        }
        if let Operation::EdgeLatch { edge, .. } = &op {
            // The next acting edge is the opposite one; wait for the right one.
            if *edge == event.edge {
                self.queue.push_front(op);
                return Ok(());
            }
        }
        let frame = self.codec.encode(&op)?;
        harness.apply(&frame.assert)?;
        let protocol = Protocol::for_op(harness.kind(), &op, self.read_buffer);
        tracing::trace!(agent = self.role.name, %op, time = %harness.time(), "driving");
        self.state = State::Asserting {
            operation: op,
            frame,
            protocol,
        };
        Ok(())
    }

    fn track(
        &mut self,
        harness: &mut Harness,
        event: &EdgeEvent,
        mut flight: InFlight,
        release: Vec<(Port, SignalValue)>,
        enable: EnableStyle,
    ) -> Result<Vec<Capture>, SimError> {
        match flight.step(harness, self.timeout)? {
            Some(capture) => {
                if enable == EnableStyle::Hold {
                    harness.apply(&release)?;
                } else {
                    self.start_next(harness, event)?;
                }
                Ok(vec![capture])
            }
            None => {
                self.state = State::Busy { flight, release };
                Ok(Vec::new())
            }
        }
    }

    fn handle(
        &mut self,
        harness: &mut Harness,
        event: &EdgeEvent,
        pre: Flags,
    ) -> Result<Vec<Capture>, SimError> {
        if harness.is_reset_asserted() {
            self.state = State::Idle;
            return Ok(Vec::new());
        }
        if !self.role.acts_on(event.clock, event.edge) {
            return Ok(Vec::new());
        }
        let lane_width = self.codec.layout().data_width;
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                self.start_next(harness, event)?;
                Ok(Vec::new())
            }
            State::Asserting {
                operation,
                frame,
                protocol,
            } => {
                if protocol.enable == EnableStyle::Pulse {
                    harness.apply(&frame.release)?;
                }
                let flight = InFlight::new(operation, protocol, event, pre, lane_width);
                self.track(harness, event, flight, frame.release, protocol.enable)
            }
            State::Busy { flight, release } => {
                let enable = flight.protocol().enable;
                self.track(harness, event, flight, release, enable)
            }
        }
    }
}

/// A latch with no enabled bit leaves the flip-flop untouched; it is driven
/// and observed as an idle edge.
fn is_hold(op: &Operation) -> bool {
    matches!(op, Operation::EdgeLatch { enable: 0, .. })
}

impl Agent for Driver {
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
        match &self.state {
            State::Busy { flight, .. } => Some(flight.sampled_at()),
            _ => None,
        }
    }

    fn is_quiet(&self) -> bool {
        self.queue.is_empty() && matches!(self.state, State::Idle)
    }

    fn abort(&mut self, harness: &Harness) {
        if let State::Busy { flight, .. } = &self.state {
            tracing::debug!(agent = self.role.name, op = %flight.operation(), "operation abandoned");
        }
        self.state = State::Idle;
        self.queue.clear();
        self.flags = Flags::read(harness);
    }
}
