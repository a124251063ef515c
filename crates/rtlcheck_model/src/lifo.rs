//! Bounded LIFO model.
//!
//! `Push` faults when full, `Pop` faults when empty. `PushPop` is the
//! same-cycle bypass: the pushed value is read straight back and the stack is
//! unchanged, so it never faults.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::LifoParams;

/// Reference model of a bounded stack.
#[derive(Clone, Debug)]
pub struct LifoModel {
    depth: u64,
    data_mask: u64,
    stack: Vec<u64>,
}

impl LifoModel {
    /// Creates an empty stack.
    pub fn new(params: &LifoParams) -> Self {
        Self {
            depth: params.depth,
            data_mask: value_mask(params.data_width),
            stack: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.stack.len() as u64 >= self.depth
    }
}

impl ReferenceModel for LifoModel {
    fn kind(&self) -> StructureKind {
        StructureKind::Lifo
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::Push { value } => {
                if self.is_full() {
                    return Response::fault();
                }
                self.stack.push(value & self.data_mask);
                Response::ok()
            }
            Operation::Pop => self
                .stack
                .pop()
                .map_or_else(Response::fault, Response::value),
            Operation::PushPop { value } => Response::value(value & self.data_mask),
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::Lifo, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status {
            length: Some(self.stack.len() as u64),
            full: Some(self.is_full()),
            empty: Some(self.stack.is_empty()),
            ..Status::default()
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
    }
}
