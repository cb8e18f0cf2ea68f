// ── Baseline / diff tracker ──
//
// Holds the last-synced settings and compares a working copy against them
// field by field. `changed_fields` is the single source for both
// `has_changes` and the patch, so the two can never disagree.

use scribe_api::{ButtonPatch, ButtonsPatch, ConfigPatch, DevicePatch, LedsPatch};

use crate::model::{DeviceSettings, GpioPin, Role};
use crate::validation::FieldKey;

/// The last-synced snapshot of the device settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    baseline: DeviceSettings,
}

impl ChangeTracker {
    pub fn new(baseline: DeviceSettings) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &DeviceSettings {
        &self.baseline
    }

    /// Fields where `working` differs from the baseline, in field order.
    pub fn changed_fields(&self, working: &DeviceSettings) -> Vec<FieldKey> {
        changed_fields(working, &self.baseline)
    }

    pub fn has_changes(&self, working: &DeviceSettings) -> bool {
        has_changes(working, &self.baseline)
    }

    /// Minimal patch taking the device from the baseline to `working`.
    pub fn diff(&self, working: &DeviceSettings) -> ConfigPatch {
        diff_payload(working, &self.baseline)
    }

    /// Fold a persisted patch into the baseline.
    ///
    /// The new baseline is built aside and swapped in whole, so a reader
    /// never sees half of a commit.
    pub fn commit(&mut self, persisted: &ConfigPatch) {
        let mut next = self.baseline.clone();
        next.apply_patch(persisted);
        self.baseline = next;
    }
}

// ── Comparison ───────────────────────────────────────────────────────

fn tracks(field: FieldKey, working: &DeviceSettings) -> bool {
    match field {
        FieldKey::Pin(Role::IndicatorStrip) => working.indicator_strip_enabled,
        _ => true,
    }
}

fn differs(field: FieldKey, working: &DeviceSettings, baseline: &DeviceSettings) -> bool {
    match field {
        FieldKey::Owner => working.owner != baseline.owner,
        FieldKey::Timezone => working.timezone != baseline.timezone,
        FieldKey::Pin(role) => {
            GpioPin::normalize(working.assignment.get(role))
                != GpioPin::normalize(baseline.assignment.get(role))
        }
    }
}

/// Fields where `working` differs from `baseline`. The LED strip pin is only
/// tracked while the strip is enabled.
pub fn changed_fields(working: &DeviceSettings, baseline: &DeviceSettings) -> Vec<FieldKey> {
    FieldKey::all()
        .filter(|&field| tracks(field, working) && differs(field, working, baseline))
        .collect()
}

pub fn has_changes(working: &DeviceSettings, baseline: &DeviceSettings) -> bool {
    !changed_fields(working, baseline).is_empty()
}

/// Only the changed fields, grouped by section. Unset pins go out as `-1`.
pub fn diff_payload(working: &DeviceSettings, baseline: &DeviceSettings) -> ConfigPatch {
    let mut device = DevicePatch::default();
    let mut buttons = ButtonsPatch::default();
    let mut leds = None;

    for field in changed_fields(working, baseline) {
        match field {
            FieldKey::Owner => device.owner = Some(working.owner.clone()),
            FieldKey::Timezone => device.timezone = Some(working.timezone.clone()),
            FieldKey::Pin(role) => {
                let wire = GpioPin::to_wire(GpioPin::normalize(working.assignment.get(role)));
                match role {
                    Role::SerialTx => device.printer_tx_pin = Some(wire),
                    Role::IndicatorStrip => leds = Some(LedsPatch { pin: wire }),
                    button => {
                        if let Some(slot) = button.button_number().and_then(|n| buttons.slot_mut(n)) {
                            *slot = Some(ButtonPatch { gpio: wire });
                        }
                    }
                }
            }
        }
    }

    ConfigPatch {
        device: (!device.is_empty()).then_some(device),
        buttons: (!buttons.is_empty()).then_some(buttons),
        leds,
    }
}

// ── Patch application ────────────────────────────────────────────────

impl DeviceSettings {
    /// Apply the fields present in `patch`. Pins sent as `-1` become unset.
    pub fn apply_patch(&mut self, patch: &ConfigPatch) {
        let wire_pin = |n: i32| GpioPin::new(n).connected();

        if let Some(device) = &patch.device {
            if let Some(owner) = &device.owner {
                self.owner.clone_from(owner);
            }
            if let Some(timezone) = &device.timezone {
                self.timezone.clone_from(timezone);
            }
            if let Some(pin) = device.printer_tx_pin {
                self.assignment.set(Role::SerialTx, wire_pin(pin));
            }
        }

        if let Some(buttons) = &patch.buttons {
            for role in Role::BUTTONS {
                let slot = match role {
                    Role::Button1 => buttons.button1,
                    Role::Button2 => buttons.button2,
                    Role::Button3 => buttons.button3,
                    _ => buttons.button4,
                };
                if let Some(ButtonPatch { gpio }) = slot {
                    self.assignment.set(role, wire_pin(gpio));
                }
            }
        }

        if let Some(LedsPatch { pin }) = patch.leds {
            self.assignment.set(Role::IndicatorStrip, wire_pin(pin));
        }
    }
}
