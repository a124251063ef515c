//! Session error types.

use rtlcheck_codec::CodecError;
use rtlcheck_common::{Operation, SimTime};
use rtlcheck_config::ConfigError;
use rtlcheck_sim::SimError;
use rtlcheck_stimulus::StimulusError;

/// Errors that end a session run early.
///
/// Mismatches are never errors; they are in the report. A [`Timeout`]
/// is also recorded in the report before it is returned.
///
/// [`Timeout`]: SessionError::Timeout
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation cannot be carried by the design.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Random stimulus could not be set up.
    #[error(transparent)]
    Stimulus(#[from] StimulusError),

    /// The harness failed.
    #[error(transparent)]
    Sim(SimError),

    /// The design stopped responding; the scenario was abandoned.
    #[error("timeout: {op} did not complete within {cycles} cycles (at {time})")]
    Timeout {
        /// The operation that hung.
        op: Operation,
        /// Clock edges waited.
        cycles: u32,
        /// When the wait was abandoned.
        time: SimTime,
    },
}

impl From<SimError> for SessionError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::Timeout { op, cycles, time } => SessionError::Timeout { op, cycles, time },
            SimError::Codec(e) => SessionError::Codec(e),
            other => SessionError::Sim(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlcheck_codec::Port;
    use rtlcheck_common::{OpKind, StructureKind};

    #[test]
    fn display_timeout() {
        let err = SessionError::Timeout {
            op: Operation::Read { target: 2 },
            cycles: 40,
            time: SimTime::from_ns(605),
        };
        assert_eq!(
            err.to_string(),
            "timeout: read(target=2) did not complete within 40 cycles (at 605 ns)"
        );
    }

    #[test]
    fn display_config() {
        let err = SessionError::from(ConfigError::MissingField("session.name".to_string()));
        assert_eq!(err.to_string(), "missing required field: session.name");
    }

    #[test]
    fn display_codec() {
        let err = SessionError::from(CodecError::Unsupported {
            op: OpKind::Pop,
            kind: StructureKind::Fifo,
        });
        assert_eq!(err.to_string(), "'pop' is not an operation of fifo");
    }

    #[test]
    fn display_stimulus() {
        let err = SessionError::from(StimulusError::UnknownOperation("jump".to_string()));
        assert_eq!(err.to_string(), "unknown operation 'jump' in weights");
    }

    #[test]
    fn display_sim() {
        let err = SessionError::from(SimError::UnknownPort(Port::Key));
        assert_eq!(err.to_string(), "design has no Key port");
    }

    #[test]
    fn sim_timeout_becomes_session_timeout() {
        let err = SessionError::from(SimError::Timeout {
            op: Operation::Dequeue,
            cycles: 3,
            time: SimTime::zero(),
        });
        assert!(matches!(err, SessionError::Timeout { cycles: 3, .. }));
    }
}
