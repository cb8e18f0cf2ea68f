// ── Validation engine ──
//
// Per-field rules over a `DeviceSettings` value. Errors are kept in a map
// keyed by field; the session revalidates every field after each edit so
// fixing one side of a pin conflict also clears the other side.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

use crate::model::{DeviceSettings, Role};
use crate::resolver;

/// A validated field, addressed by its path in the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Owner,
    Timezone,
    Pin(Role),
}

impl FieldKey {
    /// Every field the engine knows, in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Owner, Self::Timezone]
            .into_iter()
            .chain(Role::iter().map(Self::Pin))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("device.owner"),
            Self::Timezone => f.write_str("device.timezone"),
            Self::Pin(Role::SerialTx) => f.write_str("device.printerTxPin"),
            Self::Pin(Role::IndicatorStrip) => f.write_str("leds.pin"),
            Self::Pin(role) => match role.button_number() {
                Some(n) => write!(f, "buttons.button{n}.gpio"),
                None => write!(f, "{role}"),
            },
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Rules ────────────────────────────────────────────────────────────

fn require_text(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_owned())
}

/// Check one field. `None` means the field is valid.
pub fn validate(field: FieldKey, settings: &DeviceSettings) -> Option<String> {
    match field {
        FieldKey::Owner => require_text(&settings.owner, "Device owner cannot be blank"),
        FieldKey::Timezone => require_text(&settings.timezone, "Timezone cannot be blank"),
        FieldKey::Pin(role) => {
            let pin = settings.assignment.get(role)?.connected()?;
            resolver::holders(&settings.assignment, pin)
                .find(|&other| other != role)
                .map(|other| format!("{pin} is also assigned to {}", other.label()))
        }
    }
}

/// Run every rule and collect the failures.
pub fn validate_all(settings: &DeviceSettings) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in FieldKey::all() {
        if let Some(message) = validate(field, settings) {
            errors.insert(field, message);
        }
    }
    errors
}

// ── Error map ────────────────────────────────────────────────────────

/// Field → message map. Saving is blocked while it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldKey, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: FieldKey, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldKey) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Assignment, GpioPin};
    use pretty_assertions::assert_eq;

    fn valid() -> DeviceSettings {
        DeviceSettings {
            owner: "Alice".into(),
            timezone: "Europe/London".into(),
            indicator_strip_enabled: false,
            assignment: Assignment::new()
                .with(Role::SerialTx, 21)
                .with(Role::Button1, 5)
                .with(Role::Button2, 6),
        }
    }

    #[test]
    fn field_keys_use_document_paths() {
        let keys: Vec<String> = FieldKey::all().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "device.owner",
                "device.timezone",
                "device.printerTxPin",
                "leds.pin",
                "buttons.button1.gpio",
                "buttons.button2.gpio",
                "buttons.button3.gpio",
                "buttons.button4.gpio",
            ]
        );
    }

    #[test]
    fn valid_settings_have_no_errors() {
        assert!(validate_all(&valid()).is_empty());
    }

    #[test]
    fn whitespace_owner_is_blank() {
        let mut settings = valid();
        settings.owner = "   ".into();
        let errors = validate_all(&settings);
        assert_eq!(errors.get(FieldKey::Owner), Some("Device owner cannot be blank"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn blank_timezone_is_reported() {
        let mut settings = valid();
        settings.timezone.clear();
        assert_eq!(
            validate(FieldKey::Timezone, &settings).as_deref(),
            Some("Timezone cannot be blank")
        );
    }

    #[test]
    fn conflicting_pins_flag_both_fields() {
        let mut settings = valid();
        settings.assignment.set(Role::Button2, Some(GpioPin::new(5)));
        let errors = validate_all(&settings);
        assert_eq!(
            errors.get(FieldKey::Pin(Role::Button1)),
            Some("GPIO 5 is also assigned to button 2")
        );
        assert_eq!(
            errors.get(FieldKey::Pin(Role::Button2)),
            Some("GPIO 5 is also assigned to button 1")
        );
    }

    #[test]
    fn shared_sentinel_is_not_a_conflict() {
        let mut settings = valid();
        settings.assignment.set(Role::Button1, Some(GpioPin::NOT_CONNECTED));
        settings.assignment.set(Role::Button2, Some(GpioPin::NOT_CONNECTED));
        settings.assignment.clear(Role::Button3);
        assert!(validate_all(&settings).is_empty());
    }

    #[test]
    fn display_joins_entries() {
        let mut errors = ValidationErrors::default();
        errors.insert(FieldKey::Timezone, "Timezone cannot be blank");
        errors.insert(FieldKey::Owner, "Device owner cannot be blank");
        assert_eq!(
            errors.to_string(),
            "device.owner: Device owner cannot be blank; device.timezone: Timezone cannot be blank"
        );
        assert_eq!(errors.remove(FieldKey::Owner).as_deref(), Some("Device owner cannot be blank"));
        assert_eq!(errors.len(), 1);
    }
}
