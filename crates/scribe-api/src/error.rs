use thiserror::Error;

/// Top-level error type for the `scribe-api` crate.
///
/// Covers every failure mode of the device's configuration endpoint:
/// transport, URL handling, device-side rejection, and payload decoding.
/// `scribe-core` maps these into load/save errors for the session.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device ──────────────────────────────────────────────────────
    /// The device answered but refused the request.
    ///
    /// `message` is the device-supplied `error` field when present.
    #[error("Device rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
