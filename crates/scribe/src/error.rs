//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use scribe_config::ConfigError;
use scribe_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not load configuration from {url}")]
    #[diagnostic(
        code(scribe::load_failed),
        help(
            "Check that the device is powered and on the same network.\n\
             Reason: {message}\n\
             Try a longer --timeout, or --insecure (-k) for self-signed HTTPS."
        )
    )]
    LoadFailed { url: String, message: String },

    #[error("Device did not accept the new settings: {message}")]
    #[diagnostic(
        code(scribe::save_failed),
        help("Nothing on the device changed. Fix the reported problem and run the command again.")
    )]
    SaveFailed { message: String },

    #[error("Device error: {message}")]
    #[diagnostic(code(scribe::api_error))]
    ApiError { message: String },

    // ── Settings ─────────────────────────────────────────────────────
    #[error("Settings are invalid")]
    #[diagnostic(code(scribe::invalid_settings), help("{details}"))]
    InvalidSettings { details: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(scribe::not_found),
        help("Run: scribe {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(scribe::conflict), help("Use --force to replace it."))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(scribe::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(scribe::session))]
    Session { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(scribe::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: scribe config init <ADDRESS> --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(scribe::no_device),
        help(
            "Pass --device <ADDRESS>, set SCRIBE_DEVICE, or create a profile with:\n\
             scribe config init <ADDRESS>\n\
             Config file: {path}"
        )
    )]
    NoDevice { path: String },

    #[error(transparent)]
    #[diagnostic(code(scribe::config))]
    Config(Box<ConfigError>),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoadFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::InvalidSettings { .. } | Self::Validation { .. } | Self::NoDevice { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a failed load with the address that was tried.
    pub fn load_failed(url: impl Into<String>, err: &CoreError) -> Self {
        Self::LoadFailed {
            url: url.into(),
            message: err.detail(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Load { message } => CliError::LoadFailed {
                url: "the device".into(),
                message,
            },

            CoreError::Save { message } => CliError::SaveFailed { message },

            CoreError::Invalid { errors } => CliError::InvalidSettings {
                details: errors
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::UnknownPin { pin } => CliError::NotFound {
                resource_type: "GPIO".into(),
                identifier: pin.to_string(),
                list_command: "pins <ROLE>".into(),
            },

            CoreError::PinRequired { role } => CliError::Validation {
                field: role.into(),
                reason: "must be connected to a pin".into(),
            },

            CoreError::Api { message, .. } => CliError::ApiError { message },

            CoreError::Config { message } => CliError::Validation {
                field: "device".into(),
                reason: message,
            },

            other @ (CoreError::NotLoaded
            | CoreError::SaveInFlight
            | CoreError::NothingToSave
            | CoreError::SessionClosed) => CliError::Session {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scribe_core::{FieldKey, Role, ValidationErrors};

    #[test]
    fn invalid_settings_list_every_field() {
        let mut errors = ValidationErrors::default();
        errors.insert(FieldKey::Owner, "Device owner cannot be blank");
        errors.insert(FieldKey::Pin(Role::Button2), "GPIO 5 is also assigned to button 1");

        let err = CliError::from(CoreError::Invalid { errors });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        let CliError::InvalidSettings { details } = err else {
            panic!("expected InvalidSettings");
        };
        assert_eq!(
            details,
            "device.owner: Device owner cannot be blank\n\
             buttons.button2.gpio: GPIO 5 is also assigned to button 1"
        );
    }

    #[test]
    fn load_failures_are_connection_errors() {
        let err = CliError::from(CoreError::Load {
            message: "timed out".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn unknown_pin_is_not_found() {
        let err = CliError::from(CoreError::UnknownPin { pin: 33 });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "GPIO '33' not found");
    }
}
