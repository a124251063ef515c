//! Verification sessions for rtlcheck.
//!
//! A [`Session`] composes everything one run needs: the behavioural design
//! in its clocked harness, a driver and a monitor per design interface, and
//! the scoreboard owning the reference model. Components are built once from
//! an immutable [`SessionConfig`] and wired by plain calls; completed
//! operations flow through an [`OrderedQueue`] so they are checked in the
//! order the design sampled them.

#![warn(missing_docs)]

pub mod error;
pub mod ordered;
pub mod session;

pub use error::SessionError;
pub use ordered::OrderedQueue;
pub use session::Session;

use rtlcheck_config::SessionConfig;
use rtlcheck_scoreboard::Report;

/// Runs `operations` random operations against a fresh session and returns
/// the report.
///
/// A timeout ends the run but still produces a (failing) report; every
/// other error is returned.
pub fn verify(config: &SessionConfig, operations: usize) -> Result<Report, SessionError> {
    let mut session = Session::new(config)?;
    match session.run_random(operations) {
        Ok(()) | Err(SessionError::Timeout { .. }) => session.finish(),
        Err(err) => Err(err),
    }
}
