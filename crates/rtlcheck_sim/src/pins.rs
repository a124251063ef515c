//! Port storage shared by every behavioural design.

use crate::error::SimError;
use rtlcheck_codec::{BusLayout, Direction, Port, PortSample, PortSpec};
use rtlcheck_common::SignalValue;
use std::collections::BTreeMap;

/// Current value of every port of a design.
///
/// Inputs power up at zero. Outputs power up unknown and stay unknown until
/// the design drives them, which for most designs happens at reset.
#[derive(Clone, Debug)]
pub struct PinBank {
    specs: Vec<PortSpec>,
    values: BTreeMap<Port, SignalValue>,
}

impl PinBank {
    /// Creates the port set of a layout.
    pub fn new(layout: &BusLayout) -> Self {
        let specs = layout.ports().to_vec();
        let values = specs
            .iter()
            .map(|s| {
                let v = match s.direction {
                    Direction::Input => SignalValue::new(s.width),
                    Direction::Output => SignalValue::unknown(s.width),
                };
                (s.port, v)
            })
            .collect();
        Self { specs, values }
    }

    /// Every port, in layout order.
    pub fn specs(&self) -> &[PortSpec] {
        &self.specs
    }

    /// Looks up the spec of a port.
    pub fn spec(&self, port: Port) -> Option<&PortSpec> {
        self.specs.iter().find(|s| s.port == port)
    }

    /// Current value of a port.
    pub fn get(&self, port: Port) -> Option<SignalValue> {
        self.values.get(&port).copied()
    }

    /// Reads a port as an integer; missing or unknown bits read as zero.
    pub fn read(&self, port: Port) -> u64 {
        self.get(port).and_then(|v| v.to_u64()).unwrap_or(0)
    }

    /// Returns true if bit 0 of the port is a definite one.
    pub fn is_high(&self, port: Port) -> bool {
        self.get(port).is_some_and(|v| v.is_high())
    }

    /// Sets a port from the testbench side, checking existence, width, and
    /// direction.
    pub fn set(&mut self, port: Port, value: SignalValue) -> Result<(), SimError> {
        let spec = self.spec(port).ok_or(SimError::UnknownPort(port))?;
        if spec.direction != Direction::Input {
            return Err(SimError::NotAnInput(port));
        }
        if spec.width != value.width() {
            return Err(SimError::WidthMismatch {
                port,
                expected: spec.width,
                actual: value.width(),
            });
        }
        self.values.insert(port, value);
        Ok(())
    }

    /// Drives a port from the design side, truncating to its width. Ports
    /// the design does not have are ignored.
    pub fn drive(&mut self, port: Port, value: u64) {
        if let Some(width) = self.spec(port).map(|s| s.width) {
            self.values.insert(port, SignalValue::from_u64(value, width));
        }
    }

    /// Drives a wide port from a packed value.
    pub fn drive_wide(&mut self, port: Port, value: SignalValue) {
        if let Some(width) = self.spec(port).map(|s| s.width) {
            let value = match value.to_u128() {
                Some(v) => SignalValue::from_u128(v, width),
                None => SignalValue::unknown(width),
            };
            self.values.insert(port, value);
        }
    }

    /// Releases an output so that it reads as unknown.
    pub fn float(&mut self, port: Port) {
        if let Some(width) = self.spec(port).map(|s| s.width) {
            self.values.insert(port, SignalValue::unknown(width));
        }
    }

    /// Drives a single-bit port.
    pub fn drive_bool(&mut self, port: Port, bit: bool) {
        self.drive(port, u64::from(bit));
    }

    /// Snapshot of every input port.
    pub fn inputs(&self) -> PortSample {
        self.specs
            .iter()
            .filter(|s| s.direction == Direction::Input)
            .filter_map(|s| self.get(s.port).map(|v| (s.port, v)))
            .collect()
    }
}
