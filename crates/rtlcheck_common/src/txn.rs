//! Result and status records exchanged between agents, models, and the scoreboard.

use crate::op::Operation;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};

/// What an operation returned: primary value, pointers, and fault flag.
///
/// `None` fields are "don't care": a reference model leaves a field empty when
/// the design's output is undefined for the operation (for example the data
/// bus after a faulting read).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Primary output value.
    pub value: Option<u64>,
    /// Streamed or multi-lane values, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<u64>,
    /// Predecessor address.
    pub prev: Option<u64>,
    /// Successor address.
    pub next: Option<u64>,
    /// Error flag.
    pub fault: bool,
}

impl Response {
    /// A successful response with no outputs.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A faulting response with no outputs.
    pub fn fault() -> Self {
        Self {
            fault: true,
            ..Self::default()
        }
    }

    /// A successful response carrying a value.
    pub fn value(value: u64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// A successful response carrying a list of values.
    pub fn values(values: Vec<u64>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

/// Auxiliary status after an operation.
///
/// Fields are `None` when the structure (or the design's port set) does not
/// expose them. An output the design has but left unknown is also `None`,
/// and is listed in `unknown`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Number of stored elements.
    pub length: Option<u64>,
    /// Address of the first node.
    pub head: Option<u64>,
    /// Address of the last node.
    pub tail: Option<u64>,
    /// Capacity reached.
    pub full: Option<bool>,
    /// No elements stored.
    pub empty: Option<bool>,
    /// Entries colliding with the key of the last hash operation.
    pub collision_count: Option<u64>,
    /// Outputs that were present but held an unknown value when sampled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<StatusField>,
}

impl Status {
    /// Returns true if `field` was sampled as unknown.
    pub fn is_unknown(&self, field: StatusField) -> bool {
        self.unknown.contains(&field)
    }
}

/// One status output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum StatusField {
    Length,
    Head,
    Tail,
    Full,
    Empty,
    CollisionCount,
}

/// One checked operation: what was applied, what came back, and when.
///
/// Built once when the operation completes and handed to the scoreboard by
/// value; it is not modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Program order on the checked interface, starting at zero.
    pub seq: u64,
    /// Index of the clock edge at which the design sampled the operation.
    pub sampled_at: u64,
    /// Simulation time of that edge.
    pub time: SimTime,
    /// The operation with its input fields.
    pub operation: Operation,
    /// Observed outputs.
    pub response: Response,
    /// Observed status.
    pub status: Status,
    /// Whether a completion handshake was observed.
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert!(!Response::ok().fault);
        assert!(Response::fault().fault);
        assert_eq!(Response::value(7).value, Some(7));
        assert_eq!(Response::values(vec![1, 2]).values, vec![1, 2]);
    }

    #[test]
    fn default_status_is_empty() {
        let s = Status::default();
        assert!(s.length.is_none() && s.full.is_none() && s.collision_count.is_none());
        assert!(!s.is_unknown(StatusField::Full));
    }

    #[test]
    fn transaction_serializes() {
        let txn = Transaction {
            seq: 4,
            sampled_at: 17,
            time: SimTime::from_ns(170),
            operation: Operation::Dequeue,
            response: Response::value(3),
            status: Status {
                length: Some(0),
                empty: Some(true),
                ..Status::default()
            },
            done: true,
        };
        let json = serde_json::to_string(&txn).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txn);
        assert!(!json.contains("\"values\""));
        assert!(!json.contains("\"unknown\""));
    }

    #[test]
    fn unknown_fields_serialize_by_name() {
        let status = Status {
            unknown: vec![StatusField::CollisionCount],
            ..Status::default()
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"unknown\":[\"collision_count\"]"));
        assert!(status.is_unknown(StatusField::CollisionCount));
    }
}
