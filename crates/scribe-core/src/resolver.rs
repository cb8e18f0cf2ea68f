// ── Assignment resolver ──
//
// Pure queries over a catalog and an assignment. Nothing here is cached:
// callers pass the current working copy and get a fresh answer, so an
// option list can never lag behind the latest edit.
//
// Every role counts toward "in use", the LED strip included even while it
// is switched off, because its pin is still reserved in the firmware config.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{PinCatalog, PinDescriptor};
use crate::model::{Assignment, GpioPin, Role};

/// One selectable pin for a role, annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinOption {
    pub pin: GpioPin,
    pub description: String,
    pub is_safe: bool,
    pub in_use: bool,
    /// First other role holding this pin, in role order.
    pub assigned_to: Option<Role>,
    pub available: bool,
}

impl PinOption {
    fn resolve(descriptor: &PinDescriptor, role: Role, assignment: &Assignment) -> Self {
        let assigned_to = descriptor
            .pin
            .connected()
            .and_then(|pin| holders(assignment, pin).find(|&holder| holder != role));
        let in_use = assigned_to.is_some();
        Self {
            pin: descriptor.pin,
            description: descriptor.description.clone(),
            is_safe: descriptor.is_safe,
            in_use,
            assigned_to,
            available: descriptor.pin.is_sentinel() || (descriptor.is_safe && !in_use),
        }
    }

    /// Presentation label, e.g. `GPIO 4 - Safe (Unsafe) (Assigned to button 1)`.
    pub fn label(&self) -> String {
        if self.pin.is_sentinel() {
            return self.description.clone();
        }
        let mut label = format!("{} - {}", self.pin, self.description);
        if !self.is_safe {
            label.push_str(" (Unsafe)");
        }
        if let Some(holder) = self.assigned_to {
            label.push_str(" (Assigned to ");
            label.push_str(holder.label());
            label.push(')');
        }
        label
    }
}

/// A real pin bound to more than one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinConflict {
    pub pin: GpioPin,
    pub roles: Vec<Role>,
}

// ── Queries ──────────────────────────────────────────────────────────

/// Roles bound to `pin`, in role order. Always empty for the sentinel.
pub fn holders(assignment: &Assignment, pin: GpioPin) -> impl Iterator<Item = Role> + '_ {
    assignment
        .bound()
        .filter(move |&(_, bound)| bound == pin)
        .map(|(role, _)| role)
}

/// Every role holding `pin`.
pub fn owner_of(assignment: &Assignment, pin: GpioPin) -> Vec<Role> {
    holders(assignment, pin).collect()
}

/// Annotated option list for `role` against the current assignment.
///
/// The printer's TX line must always be connected, so its list has no
/// "not connected" entry.
pub fn options_for(catalog: &PinCatalog, role: Role, assignment: &Assignment) -> Vec<PinOption> {
    catalog
        .iter()
        .filter(|d| role.allows_unassigned() || !d.pin.is_sentinel())
        .map(|d| PinOption::resolve(d, role, assignment))
        .collect()
}

/// Pins currently bound to two or more roles, in pin order.
pub fn conflicts(assignment: &Assignment) -> Vec<PinConflict> {
    let mut by_pin: BTreeMap<GpioPin, Vec<Role>> = BTreeMap::new();
    for (role, pin) in assignment.bound() {
        by_pin.entry(pin).or_default().push(role);
    }
    by_pin
        .into_iter()
        .filter(|(_, roles)| roles.len() > 1)
        .map(|(pin, roles)| PinConflict { pin, roles })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn catalog() -> PinCatalog {
        PinCatalog::new([
            PinDescriptor::new(2, "Safe", true),
            PinDescriptor::new(4, "Safe", true),
            PinDescriptor::new(5, "Safe", true),
            PinDescriptor::new(18, "Avoid: USB D-", false),
        ])
    }

    fn option(options: &[PinOption], pin: i32) -> &PinOption {
        options.iter().find(|o| o.pin.number() == pin).unwrap()
    }

    #[test]
    fn unsafe_pin_held_elsewhere_is_unavailable() {
        let assignment = Assignment::new()
            .with(Role::SerialTx, 2)
            .with(Role::Button1, 18);
        let options = options_for(&catalog(), Role::Button2, &assignment);

        let pin18 = option(&options, 18);
        assert!(!pin18.is_safe);
        assert!(pin18.in_use);
        assert!(!pin18.available);
        assert_eq!(pin18.assigned_to, Some(Role::Button1));

        let pin2 = option(&options, 2);
        assert_eq!(pin2.assigned_to, Some(Role::SerialTx));
        assert!(!pin2.available);

        assert!(option(&options, 4).available);
    }

    #[test]
    fn own_pin_is_not_in_use_for_holder() {
        let assignment = Assignment::new().with(Role::Button1, 4);
        let options = options_for(&catalog(), Role::Button1, &assignment);
        let pin4 = option(&options, 4);
        assert!(!pin4.in_use);
        assert!(pin4.available);
    }

    #[test]
    fn unsafe_free_pin_is_flagged_not_available() {
        let options = options_for(&catalog(), Role::Button3, &Assignment::new());
        let pin18 = option(&options, 18);
        assert!(!pin18.in_use);
        assert!(!pin18.available);
    }

    #[test]
    fn sentinel_never_in_use() {
        let assignment = Role::iter().fold(Assignment::new(), |a, role| {
            a.with(role, GpioPin::NOT_CONNECTED)
        });
        for role in Role::iter() {
            for opt in options_for(&catalog(), role, &assignment) {
                assert!(!opt.in_use, "{role}: {:?}", opt.pin);
            }
        }
        let options = options_for(&catalog(), Role::Button4, &assignment);
        assert!(option(&options, -1).available);
    }

    #[test]
    fn serial_tx_options_omit_sentinel() {
        let options = options_for(&catalog(), Role::SerialTx, &Assignment::new());
        assert!(options.iter().all(|o| !o.pin.is_sentinel()));
        assert_eq!(options.len(), 4);

        let options = options_for(&catalog(), Role::IndicatorStrip, &Assignment::new());
        assert_eq!(options[0].pin, GpioPin::NOT_CONNECTED);
    }

    #[test]
    fn double_binding_is_visible_to_third_role() {
        // Order of assignment must not matter.
        let forward = Assignment::new().with(Role::Button1, 5).with(Role::Button2, 5);
        let backward = Assignment::new().with(Role::Button2, 5).with(Role::Button1, 5);
        for assignment in [forward, backward] {
            let options = options_for(&catalog(), Role::Button3, &assignment);
            let pin5 = option(&options, 5);
            assert!(pin5.in_use);
            assert_eq!(pin5.assigned_to, Some(Role::Button1));

            // Each holder still sees the other holder.
            let options = options_for(&catalog(), Role::Button1, &assignment);
            assert_eq!(option(&options, 5).assigned_to, Some(Role::Button2));
        }
    }

    #[test]
    fn owners_and_conflicts() {
        let assignment = Assignment::new()
            .with(Role::SerialTx, 21)
            .with(Role::Button1, 5)
            .with(Role::Button4, 5)
            .with(Role::Button2, GpioPin::NOT_CONNECTED)
            .with(Role::Button3, GpioPin::NOT_CONNECTED);

        assert_eq!(
            owner_of(&assignment, GpioPin::new(5)),
            vec![Role::Button1, Role::Button4]
        );
        assert!(owner_of(&assignment, GpioPin::NOT_CONNECTED).is_empty());
        assert_eq!(
            conflicts(&assignment),
            vec![PinConflict {
                pin: GpioPin::new(5),
                roles: vec![Role::Button1, Role::Button4],
            }]
        );
    }

    #[test]
    fn labels_carry_annotations() {
        let assignment = Assignment::new().with(Role::Button1, 18);
        let options = options_for(&catalog(), Role::Button2, &assignment);
        assert_eq!(option(&options, -1).label(), "Not connected");
        assert_eq!(option(&options, 4).label(), "GPIO 4 - Safe");
        assert_eq!(
            option(&options, 18).label(),
            "GPIO 18 - Avoid: USB D- (Unsafe) (Assigned to button 1)"
        );
    }
}
