//! Fixed-width 4-state bus values exchanged with a design under test.
//!
//! A [`SignalValue`] carries up to 128 bits. Every bit is either a definite
//! `0`/`1` or unknown (`x`), which is what an undriven or uninitialized
//! output looks like before reset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest bus a [`SignalValue`] can represent.
pub const MAX_SIGNAL_WIDTH: u32 = 128;

/// A bus value with definite and unknown bits.
///
/// Bits at or above `width` are always zero in both planes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalValue {
    width: u32,
    value: u128,
    unknown: u128,
}

/// Returns a mask covering the low `width` bits.
pub fn width_mask(width: u32) -> u128 {
    if width >= MAX_SIGNAL_WIDTH {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

impl SignalValue {
    /// Creates an all-zero value of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width: width.min(MAX_SIGNAL_WIDTH),
            value: 0,
            unknown: 0,
        }
    }

    /// Creates a value whose bits are all unknown.
    pub fn unknown(width: u32) -> Self {
        let width = width.min(MAX_SIGNAL_WIDTH);
        Self {
            width,
            value: 0,
            unknown: width_mask(width),
        }
    }

    /// Creates a single-bit value.
    pub fn from_bool(bit: bool) -> Self {
        Self::from_u64(u64::from(bit), 1)
    }

    /// Creates a value from a `u64`, truncated to `width` bits.
    pub fn from_u64(value: u64, width: u32) -> Self {
        Self::from_u128(u128::from(value), width)
    }

    /// Creates a value from a `u128`, truncated to `width` bits.
    pub fn from_u128(value: u128, width: u32) -> Self {
        let width = width.min(MAX_SIGNAL_WIDTH);
        Self {
            width,
            value: value & width_mask(width),
            unknown: 0,
        }
    }

    /// Packs equal-width lanes into one bus, lane 0 in the least significant bits.
    ///
    /// Missing lanes are zero-filled up to `lanes`.
    pub fn pack_lanes(values: &[u64], lane_width: u32, lanes: u32) -> Self {
        let mut packed = 0u128;
        let lane_mask = width_mask(lane_width);
        for (i, v) in values.iter().take(lanes as usize).enumerate() {
            packed |= (u128::from(*v) & lane_mask) << (i as u32 * lane_width);
        }
        Self::from_u128(packed, lane_width * lanes)
    }

    /// Returns the bus width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns true when no bit is unknown.
    pub fn is_known(&self) -> bool {
        self.unknown == 0
    }

    /// Returns true if bit 0 is a definite `1`.
    pub fn is_high(&self) -> bool {
        self.unknown & 1 == 0 && self.value & 1 == 1
    }

    /// Returns true if any bit is a definite `1`.
    pub fn any_high(&self) -> bool {
        self.value & !self.unknown != 0
    }

    /// Converts to a `u128` if every bit is known.
    pub fn to_u128(&self) -> Option<u128> {
        self.is_known().then_some(self.value)
    }

    /// Converts to a `u64` if every bit is known and the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    /// Extracts lane `index` of width `lane_width`, or `None` if it holds unknown bits.
    pub fn lane(&self, index: u32, lane_width: u32) -> Option<u64> {
        let shift = index * lane_width;
        if shift >= self.width {
            return None;
        }
        let mask = width_mask(lane_width);
        if (self.unknown >> shift) & mask != 0 {
            return None;
        }
        u64::try_from((self.value >> shift) & mask).ok()
    }

    /// Returns the character for bit `index`: `0`, `1`, or `x`.
    pub fn bit_char(&self, index: u32) -> char {
        if index >= self.width || (self.unknown >> index) & 1 == 1 {
            'x'
        } else if (self.value >> index) & 1 == 1 {
            '1'
        } else {
            '0'
        }
    }

    /// Formats the value as a binary string, most significant bit first.
    pub fn to_binary_string(&self) -> String {
        (0..self.width).rev().map(|i| self.bit_char(i)).collect()
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u128() {
            Some(v) => write!(f, "{}'h{v:x}", self.width),
            None => write!(f, "{}'b{}", self.width, self.to_binary_string()),
        }
    }
}

impl fmt::Debug for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalValue({self})")
    }
}
