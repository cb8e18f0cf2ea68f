//! Resource configuration engine for Scribe printer controllers.
//!
//! This crate owns the business logic between `scribe-api` and the console
//! front ends:
//!
//! - **[`PinCatalog`]**: The board's assignable GPIO pins, built once per
//!   load from the device's `gpio` section. Read-only afterwards.
//!
//! - **[`Role`] / [`Assignment`]**: The closed set of logical functions
//!   (printer TX, LED strip, four buttons) and their pin bindings.
//!
//! - **[`resolver`]**: Pure functions answering "who owns this pin" and
//!   "which pins can this role take", producing annotated [`PinOption`]s.
//!
//! - **[`ChangeTracker`]**: The last-synced baseline; decides whether a
//!   save is warranted and builds the minimal [`ConfigPatch`].
//!
//! - **[`validation`]**: Per-field rules feeding a keyed
//!   [`ValidationErrors`] map that gates saving.
//!
//! - **[`ConfigSession`]**: Lifecycle facade: guarded load, editing,
//!   single-flight save, discard and close. Transport and user
//!   notification are injected through [`ConfigTransport`] and [`Notifier`].

pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod resolver;
pub mod session;
pub mod tracker;
pub mod transport;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{PinCatalog, PinDescriptor};
pub use config::{DeviceConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Assignment, DeviceSettings, GpioPin, Role};
pub use resolver::{PinConflict, PinOption};
pub use session::{ConfigSession, EditState, LoadOutcome, SaveOutcome, SessionState};
pub use tracker::ChangeTracker;
pub use transport::{ConfigTransport, Notifier, Severity};
pub use validation::{FieldKey, ValidationErrors};

// Wire types consumers need alongside the session.
pub use scribe_api::{ConfigDocument, ConfigPatch};
