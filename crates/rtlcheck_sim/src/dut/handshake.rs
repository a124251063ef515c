use super::DefectSet;
use crate::pins::PinBank;
use rtlcheck_codec::Port;
use std::collections::VecDeque;

/// Output values presented together with one `done` pulse.
pub(crate) type Beat = Vec<(Port, u64)>;

/// Start/done sequencing of an opcode-driven design.
///
/// An operation is computed when its start is sampled; its outputs are then
/// held back for `wait` edges and presented one beat per edge, each beat with
/// `done` high. Streaming operations supply several beats.
#[derive(Debug, Default)]
pub(crate) struct Handshake {
    wait: u32,
    beats: VecDeque<Beat>,
}

impl Handshake {
    pub(crate) fn is_busy(&self) -> bool {
        !self.beats.is_empty()
    }

    pub(crate) fn begin(&mut self, wait: u32, beats: Vec<Beat>) {
        self.wait = wait;
        self.beats = beats.into();
    }

    pub(crate) fn clear(&mut self) {
        self.wait = 0;
        self.beats.clear();
    }

    /// Advances one edge, presenting the next beat once the wait has elapsed.
    pub(crate) fn advance(&mut self, pins: &mut PinBank, defects: DefectSet) {
        if self.beats.is_empty() {
            return;
        }
        if self.wait > 0 {
            self.wait -= 1;
            return;
        }
        let Some(beat) = self.beats.pop_front() else {
            return;
        };
        for (port, value) in beat {
            let value = match port {
                Port::Fault => u64::from(defects.fault(value != 0)),
                Port::DataOut => defects.data(value),
                _ => value,
            };
            pins.drive(port, value);
        }
        pins.drive_bool(Port::Done, !defects.never_done);
    }
}
