// ── Domain model ──
//
// Canonical types for the console: pins, roles, and the editable settings
// that baseline and working copy are made of.

pub mod pin;
pub mod role;
pub mod settings;

pub use pin::GpioPin;
pub use role::Role;
pub use settings::{Assignment, DeviceSettings};
