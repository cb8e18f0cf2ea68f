// Configuration document wire types
//
// `ConfigDocument` mirrors what `GET /api/config` returns. Only the sections
// the console edits are modelled; every other key (wifi, mqtt, apis, ...)
// lands in `extra` so a round-trip never loses data. `ConfigPatch` is the
// partial document sent to `POST /api/config`: absent fields mean
// "unchanged" on the device side, so nothing is serialized unless set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Full document ────────────────────────────────────────────────────

/// The device's full configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<ButtonsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leds: Option<LedsSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpio: Option<GpioSection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `device` section: identity plus the printer's UART TX pin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSection {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub printer_tx_pin: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `buttons` section: exactly four hardware buttons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button1: Option<ButtonSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button2: Option<ButtonSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button3: Option<ButtonSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button4: Option<ButtonSection>,
}

impl ButtonsSection {
    /// Look up a button by its 1-based number.
    pub fn button(&self, number: u8) -> Option<&ButtonSection> {
        match number {
            1 => self.button1.as_ref(),
            2 => self.button2.as_ref(),
            3 => self.button3.as_ref(),
            4 => self.button4.as_ref(),
            _ => None,
        }
    }
}

/// A single button. Actions and MQTT topics are carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSection {
    #[serde(default)]
    pub gpio: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `leds` section: only present when LED support is compiled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedsSection {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub pin: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `gpio` section: the board's pin catalog.
///
/// `available_pins` is kept optional so a missing list can be told apart
/// from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpioSection {
    #[serde(default)]
    pub available_pins: Option<Vec<i32>>,
    #[serde(default)]
    pub safe_pins: Vec<i32>,
    /// Keyed by the pin number rendered as a string (JSON object keys).
    #[serde(default)]
    pub pin_descriptions: BTreeMap<String, String>,
}

// ── Partial update ───────────────────────────────────────────────────

/// Partial document for `POST /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DevicePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<ButtonsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leds: Option<LedsPatch>,
}

impl ConfigPatch {
    /// `true` when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.device.is_none() && self.buttons.is_none() && self.leds.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_tx_pin: Option<i32>,
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.timezone.is_none() && self.printer_tx_pin.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button1: Option<ButtonPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button2: Option<ButtonPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button3: Option<ButtonPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button4: Option<ButtonPatch>,
}

impl ButtonsPatch {
    pub fn is_empty(&self) -> bool {
        self.button1.is_none()
            && self.button2.is_none()
            && self.button3.is_none()
            && self.button4.is_none()
    }

    /// Mutable slot for a button by its 1-based number.
    pub fn slot_mut(&mut self, number: u8) -> Option<&mut Option<ButtonPatch>> {
        match number {
            1 => Some(&mut self.button1),
            2 => Some(&mut self.button2),
            3 => Some(&mut self.button3),
            4 => Some(&mut self.button4),
            _ => None,
        }
    }
}

/// `-1` means "not connected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPatch {
    pub gpio: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedsPatch {
    pub pin: i32,
}

// ── Save response ────────────────────────────────────────────────────

/// Body returned by `POST /api/config`, on success and on rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn document_keeps_unmodelled_sections() {
        let raw = json!({
            "device": { "owner": "Alice", "timezone": "Europe/London", "printerTxPin": 21, "mdns": "scribe.local" },
            "wifi": { "ssid": "home" },
            "buttons": { "button1": { "gpio": 5, "shortAction": "/api/joke" } }
        });

        let doc: ConfigDocument = serde_json::from_value(raw.clone()).unwrap();
        let device = doc.device.as_ref().unwrap();
        assert_eq!(device.printer_tx_pin, Some(21));
        assert_eq!(device.extra["mdns"], json!("scribe.local"));
        assert!(doc.extra.contains_key("wifi"));
        assert_eq!(doc.buttons.as_ref().unwrap().button(1).unwrap().gpio, Some(5));
        assert!(doc.leds.is_none());

        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn null_gpio_reads_as_unset() {
        let doc: ConfigDocument =
            serde_json::from_value(json!({ "buttons": { "button2": { "gpio": null } } })).unwrap();
        assert_eq!(doc.buttons.unwrap().button(2).unwrap().gpio, None);
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = ConfigPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }

    #[test]
    fn patch_omits_untouched_fields() {
        let patch = ConfigPatch {
            device: Some(DevicePatch {
                printer_tx_pin: Some(20),
                ..DevicePatch::default()
            }),
            buttons: Some(ButtonsPatch {
                button3: Some(ButtonPatch { gpio: -1 }),
                ..ButtonsPatch::default()
            }),
            leds: None,
        };

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "device": { "printerTxPin": 20 },
                "buttons": { "button3": { "gpio": -1 } }
            })
        );
    }
}
