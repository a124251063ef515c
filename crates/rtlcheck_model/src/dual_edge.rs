//! Dual-edge flip-flop model.
//!
//! An [`EdgeLatch`](Operation::EdgeLatch) updates the bits selected by its
//! enable mask on the named edge: `out = (out & !enable) | (value & enable)`.
//! A zero mask checks that the output holds.

use crate::{unsupported, value_mask, ReferenceModel};
use rtlcheck_common::{Operation, Response, Status, StructureKind};
use rtlcheck_config::DualEdgeParams;

/// Reference model of a flip-flop latching on both edges.
#[derive(Clone, Debug)]
pub struct DualEdgeModel {
    mask: u64,
    reset_value: u64,
    out: u64,
}

impl DualEdgeModel {
    /// Creates the model holding its reset value.
    pub fn new(params: &DualEdgeParams) -> Self {
        let mask = value_mask(params.data_width);
        Self {
            mask,
            reset_value: params.reset_value & mask,
            out: params.reset_value & mask,
        }
    }

    /// Current output.
    pub fn output(&self) -> u64 {
        self.out
    }
}

impl ReferenceModel for DualEdgeModel {
    fn kind(&self) -> StructureKind {
        StructureKind::DualEdgeFf
    }

    fn apply(&mut self, op: &Operation) -> Response {
        match op {
            Operation::EdgeLatch { value, enable, .. } => {
                let enable = enable & self.mask;
                self.out = (self.out & !enable) | (value & enable);
                Response::value(self.out)
            }
            Operation::Idle => Response::ok(),
            other => unsupported(StructureKind::DualEdgeFf, other),
        }
    }

    fn snapshot(&self) -> Status {
        Status::default()
    }

    fn reset(&mut self) {
        self.out = self.reset_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlcheck_common::Edge;

    fn latch(edge: Edge, value: u64, enable: u64) -> Operation {
        Operation::EdgeLatch {
            edge,
            value,
            enable,
        }
    }

    #[test]
    fn partial_enable_merges_bits() {
        let mut m = DualEdgeModel::new(&DualEdgeParams::default());
        m.apply(&latch(Edge::Rising, 0xff, 0x0f));
        assert_eq!(m.output(), 0x0f);
        let r = m.apply(&latch(Edge::Falling, 0xa0, 0xf0));
        assert_eq!(r.value, Some(0xaf));
    }

    #[test]
    fn zero_enable_holds() {
        let mut m = DualEdgeModel::new(&DualEdgeParams {
            data_width: 8,
            reset_value: 0x5a,
        });
        assert_eq!(m.apply(&latch(Edge::Rising, 0xff, 0)).value, Some(0x5a));
    }

    #[test]
    fn reset_restores_reset_value() {
        let mut m = DualEdgeModel::new(&DualEdgeParams {
            data_width: 4,
            reset_value: 0x3,
        });
        m.apply(&latch(Edge::Rising, 0xc, 0xf));
        m.reset();
        assert_eq!(m.output(), 0x3);
    }
}
