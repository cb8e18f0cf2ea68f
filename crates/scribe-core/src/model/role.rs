// ── Logical roles ──
//
// The closed set of functions that can claim a GPIO line. Each role holds
// at most one pin. The set is fixed by the firmware; it is not extensible.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

/// A logical function that may claim one physical pin.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum Role {
    /// Thermal printer UART TX.
    #[strum(to_string = "serial-tx", serialize = "printer")]
    SerialTx,
    /// Addressable LED strip data line.
    #[strum(to_string = "indicator-strip", serialize = "led", serialize = "leds")]
    IndicatorStrip,
    #[strum(to_string = "button1")]
    Button1,
    #[strum(to_string = "button2")]
    Button2,
    #[strum(to_string = "button3")]
    Button3,
    #[strum(to_string = "button4")]
    Button4,
}

impl Role {
    pub const BUTTONS: [Self; 4] = [Self::Button1, Self::Button2, Self::Button3, Self::Button4];

    /// Position of this role in an [`Assignment`](super::Assignment).
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Human label used in "Assigned to ..." annotations.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SerialTx => "printer",
            Self::IndicatorStrip => "LED strip",
            Self::Button1 => "button 1",
            Self::Button2 => "button 2",
            Self::Button3 => "button 3",
            Self::Button4 => "button 4",
        }
    }

    /// 1-based button number, for button roles only.
    pub const fn button_number(self) -> Option<u8> {
        match self {
            Self::Button1 => Some(1),
            Self::Button2 => Some(2),
            Self::Button3 => Some(3),
            Self::Button4 => Some(4),
            Self::SerialTx | Self::IndicatorStrip => None,
        }
    }

    /// Button role for a 1-based number.
    pub fn button(number: u8) -> Option<Self> {
        Self::BUTTONS.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// The printer needs a TX line; every other role may be left unconnected.
    pub const fn allows_unassigned(self) -> bool {
        !matches!(self, Self::SerialTx)
    }
}
