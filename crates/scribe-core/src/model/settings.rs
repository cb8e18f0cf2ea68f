// ── Editable device settings ──
//
// `DeviceSettings` is the part of the configuration document the console
// edits. Baseline and working copy are both plain values of this type, so
// cloning one never aliases the other.

use serde::Serialize;
use serde::ser::SerializeMap;
use strum::{EnumCount, IntoEnumIterator};

use super::pin::GpioPin;
use super::role::Role;

/// Role → pin bindings at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assignment {
    pins: [Option<GpioPin>; Role::COUNT],
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding, mostly for fixtures.
    pub fn with(mut self, role: Role, pin: impl Into<GpioPin>) -> Self {
        self.set(role, Some(pin.into()));
        self
    }

    /// The pin bound to `role`, exactly as stored (may be the sentinel).
    pub fn get(&self, role: Role) -> Option<GpioPin> {
        self.pins[role.index()]
    }

    pub fn set(&mut self, role: Role, pin: Option<GpioPin>) {
        self.pins[role.index()] = pin;
    }

    /// Clear a binding (the role becomes unset).
    pub fn clear(&mut self, role: Role) {
        self.set(role, None);
    }

    /// Every role with its binding, in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<GpioPin>)> + '_ {
        Role::iter().map(move |role| (role, self.get(role)))
    }

    /// Roles bound to a real pin (sentinel and unset skipped).
    pub fn bound(&self) -> impl Iterator<Item = (Role, GpioPin)> + '_ {
        self.iter()
            .filter_map(|(role, pin)| GpioPin::normalize(pin).map(|p| (role, p)))
    }
}

impl Serialize for Assignment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Role::COUNT))?;
        for (role, pin) in self.iter() {
            map.serialize_entry(&role, &pin)?;
        }
        map.end()
    }
}

/// The editable subset of the device configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSettings {
    pub owner: String,
    pub timezone: String,
    /// LED support compiled into the firmware and switched on. Gates whether
    /// the strip pin is tracked and sent.
    pub indicator_strip_enabled: bool,
    pub assignment: Assignment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn clone_is_independent() {
        let baseline = DeviceSettings {
            owner: "Alice".into(),
            assignment: Assignment::new().with(Role::Button1, 5),
            ..DeviceSettings::default()
        };
        let mut working = baseline.clone();
        working.assignment.set(Role::Button1, Some(GpioPin::new(6)));
        working.owner.push_str(" Smith");

        assert_eq!(baseline.assignment.get(Role::Button1), Some(GpioPin::new(5)));
        assert_eq!(baseline.owner, "Alice");
    }

    #[test]
    fn bound_skips_sentinel_and_unset() {
        let assignment = Assignment::new()
            .with(Role::SerialTx, 21)
            .with(Role::Button2, GpioPin::NOT_CONNECTED);
        let bound: Vec<_> = assignment.bound().collect();
        assert_eq!(bound, vec![(Role::SerialTx, GpioPin::new(21))]);
    }

    #[test]
    fn serializes_as_role_map() {
        let assignment = Assignment::new().with(Role::SerialTx, 21).with(Role::Button4, 4);
        assert_eq!(
            serde_json::to_value(assignment).unwrap_or_default(),
            json!({
                "serial-tx": 21,
                "indicator-strip": null,
                "button1": null,
                "button2": null,
                "button3": null,
                "button4": 4
            })
        );
    }
}
