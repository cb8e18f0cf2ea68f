// ── Core error types ──
//
// User-facing errors from scribe-core. Consumers never see reqwest or
// serde failures directly: the `From<scribe_api::Error>` impl folds
// transport-layer errors into `Api` or `Config`, and the session wraps
// them again as `Load` / `Save` with the message shown to the operator.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Failed to load device configuration: {message}")]
    Load { message: String },

    #[error("Failed to save device settings: {message}")]
    Save { message: String },

    #[error("Configuration has not been loaded")]
    NotLoaded,

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("No changes to save")]
    NothingToSave,

    #[error("Settings are invalid: {errors}")]
    Invalid { errors: ValidationErrors },

    #[error("GPIO {pin} is not available on this board")]
    UnknownPin { pin: i32 },

    #[error("The {role} must be connected to a pin")]
    PinRequired { role: &'static str },

    #[error("Session has been closed")]
    SessionClosed,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        /// Whether retrying by hand is likely to help.
        transient: bool,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Message without the lifecycle prefix, for notifications that add
    /// their own wording.
    pub fn detail(&self) -> String {
        match self {
            Self::Load { message } | Self::Save { message } | Self::Api { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<scribe_api::Error> for CoreError {
    fn from(err: scribe_api::Error) -> Self {
        match err {
            scribe_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid device URL: {e}"),
            },
            scribe_api::Error::Tls(message) => CoreError::Config { message },
            scribe_api::Error::Rejected { ref message, .. } => CoreError::Api {
                message: message.clone(),
                status: err.status(),
                transient: err.is_transient(),
            },
            other => CoreError::Api {
                message: other.to_string(),
                status: other.status(),
                transient: other.is_transient(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_device_message() {
        let err = CoreError::from(scribe_api::Error::Rejected {
            status: 400,
            message: "Invalid GPIO pin".into(),
        });
        assert_eq!(err.to_string(), "Invalid GPIO pin");
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(400),
                transient: false,
                ..
            }
        ));
    }

    #[test]
    fn server_errors_are_transient() {
        let err = CoreError::from(scribe_api::Error::Rejected {
            status: 503,
            message: "busy".into(),
        });
        assert!(matches!(err, CoreError::Api { transient: true, .. }));
    }

    #[test]
    fn bad_url_is_a_config_error() {
        let parse = url::Url::parse("not a url").unwrap_err();
        let err = CoreError::from(scribe_api::Error::InvalidUrl(parse));
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn detail_strips_prefix() {
        let err = CoreError::Save {
            message: "device offline".into(),
        };
        assert_eq!(err.to_string(), "Failed to save device settings: device offline");
        assert_eq!(err.detail(), "device offline");
    }
}
