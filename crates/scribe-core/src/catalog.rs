// ── Resource catalog ──
//
// Every assignable GPIO line on the board, with its description and safety
// classification. Built once per load and never mutated afterwards; the
// session shares it behind an `Arc`.

use serde::Serialize;

use crate::model::GpioPin;

const NOT_CONNECTED_DESCRIPTION: &str = "Not connected";

/// One assignable pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinDescriptor {
    pub pin: GpioPin,
    pub description: String,
    /// Unsafe pins (strapping pins, USB lines, onboard LED) stay assignable
    /// but must be flagged wherever they are shown.
    pub is_safe: bool,
}

impl PinDescriptor {
    pub fn new(pin: impl Into<GpioPin>, description: impl Into<String>, is_safe: bool) -> Self {
        Self {
            pin: pin.into(),
            description: description.into(),
            is_safe,
        }
    }

    pub fn not_connected() -> Self {
        Self::new(GpioPin::NOT_CONNECTED, NOT_CONNECTED_DESCRIPTION, true)
    }
}

/// The board's pin catalog, in device order with the sentinel first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PinCatalog {
    pins: Vec<PinDescriptor>,
}

impl PinCatalog {
    /// Build a catalog. The sentinel is always present, safe, and first;
    /// duplicate pin entries keep their first occurrence.
    pub fn new(pins: impl IntoIterator<Item = PinDescriptor>) -> Self {
        let mut out: Vec<PinDescriptor> = vec![PinDescriptor::not_connected()];
        for descriptor in pins {
            if descriptor.pin.is_sentinel() {
                continue;
            }
            if out.iter().any(|d| d.pin == descriptor.pin) {
                continue;
            }
            out.push(descriptor);
        }
        Self { pins: out }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinDescriptor> {
        self.pins.iter()
    }

    pub fn get(&self, pin: GpioPin) -> Option<&PinDescriptor> {
        self.pins.iter().find(|d| d.pin == pin)
    }

    pub fn contains(&self, pin: GpioPin) -> bool {
        self.get(pin).is_some()
    }

    pub fn is_safe(&self, pin: GpioPin) -> bool {
        self.get(pin).is_some_and(|d| d.is_safe)
    }

    /// Number of entries, sentinel included.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// A catalog always holds at least the sentinel.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_inserted_first() {
        let catalog = PinCatalog::new([PinDescriptor::new(4, "Safe", true)]);
        let pins: Vec<i32> = catalog.iter().map(|d| d.pin.number()).collect();
        assert_eq!(pins, vec![-1, 4]);
        assert!(catalog.is_safe(GpioPin::NOT_CONNECTED));
    }

    #[test]
    fn device_sentinel_is_replaced_with_canonical_entry() {
        let catalog = PinCatalog::new([
            PinDescriptor::new(-1, "nothing", false),
            PinDescriptor::new(2, "Safe", true),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.is_safe(GpioPin::NOT_CONNECTED));
        assert_eq!(
            catalog.get(GpioPin::NOT_CONNECTED).map(|d| d.description.as_str()),
            Some("Not connected")
        );
    }

    #[test]
    fn duplicates_keep_first_entry() {
        let catalog = PinCatalog::new([
            PinDescriptor::new(8, "Avoid: Onboard LED", false),
            PinDescriptor::new(8, "Safe", true),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_safe(GpioPin::new(8)));
        assert!(!catalog.contains(GpioPin::new(9)));
    }
}
