// ── API-to-domain conversions ──
//
// Bridges the raw `scribe_api` document into the catalog and the editable
// settings. Missing optional data is normalized here, once, so every later
// comparison sees the same spelling of "unset": empty strings for text and
// `None` for pins.

use tracing::warn;

use scribe_api::{ConfigDocument, GpioSection};

use crate::catalog::{PinCatalog, PinDescriptor};
use crate::error::CoreError;
use crate::model::{DeviceSettings, GpioPin, Role};

const UNKNOWN_DESCRIPTION: &str = "Unknown";

// ── Catalog ────────────────────────────────────────────────────────

impl TryFrom<&GpioSection> for PinCatalog {
    type Error = CoreError;

    fn try_from(gpio: &GpioSection) -> Result<Self, Self::Error> {
        let available = gpio
            .available_pins
            .as_ref()
            .ok_or_else(|| CoreError::Load {
                message: "device catalog is missing gpio.availablePins".into(),
            })?;

        let descriptors = available.iter().map(|&number| {
            let description = gpio
                .pin_descriptions
                .get(&number.to_string())
                .cloned()
                .unwrap_or_else(|| UNKNOWN_DESCRIPTION.into());
            PinDescriptor::new(number, description, gpio.safe_pins.contains(&number))
        });

        Ok(Self::new(descriptors))
    }
}

impl TryFrom<&ConfigDocument> for PinCatalog {
    type Error = CoreError;

    fn try_from(doc: &ConfigDocument) -> Result<Self, Self::Error> {
        let gpio = doc.gpio.as_ref().ok_or_else(|| CoreError::Load {
            message: "configuration is missing the gpio section".into(),
        })?;
        Self::try_from(gpio)
    }
}

// ── Settings ───────────────────────────────────────────────────────

impl From<&ConfigDocument> for DeviceSettings {
    fn from(doc: &ConfigDocument) -> Self {
        let mut settings = Self::default();

        match doc.device.as_ref() {
            Some(device) => {
                settings.owner = device.owner.clone().unwrap_or_default();
                settings.timezone = device.timezone.clone().unwrap_or_default();
                settings
                    .assignment
                    .set(Role::SerialTx, device.printer_tx_pin.map(GpioPin::new));
                if device.owner.is_none() {
                    warn!("configuration is missing device.owner");
                }
                if device.timezone.is_none() {
                    warn!("configuration is missing device.timezone");
                }
            }
            None => warn!("configuration is missing the device section"),
        }

        match doc.buttons.as_ref() {
            Some(buttons) => {
                for role in Role::BUTTONS {
                    let gpio = role
                        .button_number()
                        .and_then(|n| buttons.button(n))
                        .and_then(|b| b.gpio);
                    settings.assignment.set(role, gpio.map(GpioPin::new));
                }
            }
            None => warn!("configuration is missing the buttons section"),
        }

        if let Some(leds) = doc.leds.as_ref() {
            settings.indicator_strip_enabled = leds.enabled.unwrap_or(false);
            settings
                .assignment
                .set(Role::IndicatorStrip, leds.pin.map(GpioPin::new));
        }

        settings
    }
}

/// Build the catalog and the baseline settings from one document.
pub fn settings_from_document(
    doc: &ConfigDocument,
) -> Result<(PinCatalog, DeviceSettings), CoreError> {
    let catalog = PinCatalog::try_from(doc)?;
    Ok((catalog, DeviceSettings::from(doc)))
}
