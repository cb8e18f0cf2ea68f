// ── Runtime connection configuration ──
//
// Describes *how* to reach one device. Built by the CLI from a profile or
// flags and handed in; core never reads config files.

use std::time::Duration;

use url::Url;

use scribe_api::{DeviceClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed device certificates).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device base URL (e.g., `http://scribe.local`).
    pub url: Url,
    /// TLS verification strategy, only relevant for `https` URLs.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl DeviceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Parse a user-supplied address. A bare host gets `http://`.
    pub fn parse(address: &str) -> Result<Self, CoreError> {
        let trimmed = address.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };
        let url = Url::parse(&candidate).map_err(|e| CoreError::Config {
            message: format!("invalid device address '{address}': {e}"),
        })?;
        Ok(Self::new(url))
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            cookie_jar: None,
        }
    }

    /// Build the HTTP client for this device.
    pub fn build_client(&self) -> Result<DeviceClient, CoreError> {
        Ok(DeviceClient::new(self.url.clone(), &self.transport())?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let config = DeviceConfig::parse("scribe.local").unwrap();
        assert_eq!(config.url.as_str(), "http://scribe.local/");
        assert_eq!(config.timeout, DeviceConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let config = DeviceConfig::parse("https://10.0.0.7:8443").unwrap();
        assert_eq!(config.url.scheme(), "https");
        assert_eq!(config.url.port(), Some(8443));
    }

    #[test]
    fn garbage_is_a_config_error() {
        let err = DeviceConfig::parse("http://").unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn insecure_maps_to_transport_mode() {
        let mut config = DeviceConfig::parse("10.0.0.7").unwrap();
        config.tls = TlsVerification::DangerAcceptInvalid;
        assert_eq!(config.transport().tls, TlsMode::DangerAcceptInvalid);
    }
}
