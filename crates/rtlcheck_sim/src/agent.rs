//! The interface shared by drivers and monitors.

use crate::clock::EdgeEvent;
use crate::error::SimError;
use crate::harness::Harness;
use crate::inflight::Capture;
use crate::protocol::AgentRole;

/// Where an agent is in its per-operation state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentPhase {
    /// Nothing in progress.
    Idle,
    /// Inputs driven, waiting for the sampling edge.
    Asserting,
    /// Sampled, waiting for completion.
    WaitingDone,
    /// Completed, waiting for the read data to settle.
    Capturing,
}

/// A clock-edge state machine attached to one role of a design.
///
/// The session hands every edge to every agent, monitors before drivers,
/// right after the design has reacted to it.
pub trait Agent {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// The interface the agent serves.
    fn role(&self) -> &AgentRole;

    /// Reacts to one edge and returns the operations that completed on it.
    fn on_event(&mut self, harness: &mut Harness, event: &EdgeEvent)
        -> Result<Vec<Capture>, SimError>;

    /// Sampling edge of the operation in progress, if one has been sampled.
    fn in_flight_since(&self) -> Option<u64>;

    /// Returns true when the agent has nothing left to do.
    fn is_quiet(&self) -> bool;

    /// Drops any operation in progress and resynchronizes with the design.
    fn abort(&mut self, harness: &Harness);
}
