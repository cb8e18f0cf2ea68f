// ── GPIO pin identifier ──
//
// Pins are plain integers on the wire. `-1` is the "not connected"
// sentinel: any number of roles may hold it and it never counts as used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A GPIO line on the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GpioPin(i32);

impl GpioPin {
    /// The "not connected" sentinel.
    pub const NOT_CONNECTED: Self = Self(-1);

    pub const fn new(number: i32) -> Self {
        Self(number)
    }

    pub const fn number(self) -> i32 {
        self.0
    }

    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::NOT_CONNECTED.0
    }

    /// `None` for the sentinel, `Some(self)` for a real pin.
    pub const fn connected(self) -> Option<Self> {
        if self.is_sentinel() { None } else { Some(self) }
    }

    /// Collapse every spelling of "unset" (`None`, `-1`) into `None`.
    pub fn normalize(binding: Option<Self>) -> Option<Self> {
        binding.and_then(Self::connected)
    }

    /// Wire form of a binding: unset becomes `-1`.
    pub fn to_wire(binding: Option<Self>) -> i32 {
        binding.unwrap_or(Self::NOT_CONNECTED).0
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str("not connected")
        } else {
            write!(f, "GPIO {}", self.0)
        }
    }
}

impl From<i32> for GpioPin {
    fn from(number: i32) -> Self {
        Self(number)
    }
}

impl FromStr for GpioPin {
    type Err = std::num::ParseIntError;

    /// Accepts `5`, `GPIO5`, `gpio 5`, `-1` and `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("nc") {
            return Ok(Self::NOT_CONNECTED);
        }
        let digits = trimmed
            .strip_prefix("GPIO")
            .or_else(|| trimmed.strip_prefix("gpio"))
            .unwrap_or(trimmed)
            .trim();
        digits.parse().map(Self)
    }
}
