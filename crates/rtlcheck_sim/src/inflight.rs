//! Tracking of one operation from its sampling edge to its completion.

use crate::clock::EdgeEvent;
use crate::error::SimError;
use crate::harness::Harness;
use crate::protocol::{Completion, FaultSource, Protocol};
use rtlcheck_codec::Port;
use rtlcheck_common::{Operation, Response, SimTime, Status, StatusField, Transaction};

/// Full and empty flags as seen between two edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// Full flag.
    pub full: bool,
    /// Empty flag.
    pub empty: bool,
}

impl Flags {
    /// Reads the flags from the design; missing flags read low.
    pub fn read(harness: &Harness) -> Self {
        let high = |port| harness.peek(port).is_some_and(|v| v.is_high());
        Self {
            full: high(Port::Full),
            empty: high(Port::Empty),
        }
    }
}

/// A completed operation as observed on the bus, before it is given a
/// sequence number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Index of the sampling edge.
    pub sampled_at: u64,
    /// Time of the sampling edge.
    pub time: SimTime,
    /// The operation.
    pub operation: Operation,
    /// Observed outputs.
    pub response: Response,
    /// Observed status.
    pub status: Status,
    /// Whether a done handshake was observed.
    pub done: bool,
}

impl Capture {
    /// Freezes the capture into a transaction.
    pub fn into_transaction(self, seq: u64) -> Transaction {
        Transaction {
            seq,
            sampled_at: self.sampled_at,
            time: self.time,
            operation: self.operation,
            response: self.response,
            status: self.status,
            done: self.done,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Waiting,
    Capturing(u32),
}

/// An operation the design has sampled but not yet finished.
#[derive(Clone, Debug)]
pub(crate) struct InFlight {
    operation: Operation,
    protocol: Protocol,
    sampled_at: u64,
    time: SimTime,
    lane_width: u32,
    pre: Flags,
    waited: u32,
    stage: Stage,
    response: Response,
    status: Status,
}

impl InFlight {
    /// Starts tracking `operation`, sampled at `event` with the flags `pre`
    /// standing before that edge.
    pub(crate) fn new(
        operation: Operation,
        protocol: Protocol,
        event: &EdgeEvent,
        pre: Flags,
        lane_width: u32,
    ) -> Self {
        Self {
            operation,
            protocol,
            sampled_at: event.index,
            time: event.time,
            lane_width,
            pre,
            waited: 0,
            stage: Stage::Waiting,
            response: Response::default(),
            status: Status::default(),
        }
    }

    pub(crate) fn sampled_at(&self) -> u64 {
        self.sampled_at
    }

    pub(crate) fn operation(&self) -> &Operation {
        &self.operation
    }

    pub(crate) fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub(crate) fn is_capturing(&self) -> bool {
        matches!(self.stage, Stage::Capturing(_))
    }

    /// Advances one acting edge. Returns the capture once the operation is
    /// over.
    pub(crate) fn step(
        &mut self,
        harness: &Harness,
        timeout: u32,
    ) -> Result<Option<Capture>, SimError> {
        if let Stage::Capturing(left) = self.stage {
            if left > 1 {
                self.stage = Stage::Capturing(left - 1);
                return Ok(None);
            }
            self.capture_value(harness);
            return Ok(Some(self.finish()));
        }

        let high = |port| harness.peek(port).is_some_and(|v| v.is_high());
        let complete = match self.protocol.completion {
            Completion::Done => high(Port::Done),
            Completion::DoneStream => {
                if high(Port::Done) {
                    if !high(Port::Fault) {
                        if let Some(v) = harness.peek(Port::DataOut).and_then(|v| v.to_u64()) {
                            self.response.values.push(v);
                        }
                    }
                    !high(Port::InProgress)
                } else {
                    false
                }
            }
            Completion::Fixed(edges) => self.waited >= edges,
        };

        if !complete {
            self.waited += 1;
            if self.waited > timeout {
                return Err(SimError::Timeout {
                    op: self.operation.clone(),
                    cycles: timeout,
                    time: harness.time(),
                });
            }
            return Ok(None);
        }

        self.response.fault = match self.protocol.fault {
            FaultSource::Signal => high(Port::Fault),
            FaultSource::PreEdgeFull => self.pre.full,
            FaultSource::PreEdgeEmpty => self.pre.empty,
            FaultSource::None => false,
        };
        let num = |port| harness.peek(port).and_then(|v| v.to_u64());
        self.response.prev = num(Port::PrevAddr);
        self.response.next = num(Port::NextAddr);
        self.status = sample_status(harness);

        if self.protocol.capture_delay == 0 {
            self.capture_value(harness);
            Ok(Some(self.finish()))
        } else {
            self.stage = Stage::Capturing(self.protocol.capture_delay);
            Ok(None)
        }
    }

    fn capture_value(&mut self, harness: &Harness) {
        if self.protocol.completion == Completion::DoneStream {
            return;
        }
        let Some(bus) = harness.peek(self.protocol.value_port) else {
            return;
        };
        if self.protocol.value_lanes > 0 {
            self.response.values = (0..self.protocol.value_lanes)
                .filter_map(|lane| bus.lane(lane, self.lane_width))
                .collect();
        } else {
            self.response.value = bus.to_u64();
        }
    }

    fn finish(&mut self) -> Capture {
        Capture {
            sampled_at: self.sampled_at,
            time: self.time,
            operation: self.operation.clone(),
            response: std::mem::take(&mut self.response),
            status: std::mem::take(&mut self.status),
            done: self.protocol.has_handshake(),
        }
    }
}

/// Reads every status output. Ports the design lacks stay `None`; ports
/// holding X or Z are `None` and listed as unknown.
fn sample_status(harness: &Harness) -> Status {
    let mut status = Status::default();
    let mut num = |port: Port, field: StatusField| -> Option<u64> {
        let value = harness.peek(port)?;
        let known = value.to_u64();
        if known.is_none() {
            status.unknown.push(field);
        }
        known
    };
    let length = num(Port::Length, StatusField::Length);
    let head = num(Port::Head, StatusField::Head);
    let tail = num(Port::Tail, StatusField::Tail);
    let full = num(Port::Full, StatusField::Full).map(|v| v & 1 == 1);
    let empty = num(Port::Empty, StatusField::Empty).map(|v| v & 1 == 1);
    let collision_count = num(Port::CollisionCount, StatusField::CollisionCount);
    Status {
        length,
        head,
        tail,
        full,
        empty,
        collision_count,
        ..status
    }
}
