// ── Injected collaborators ──
//
// The session never talks HTTP or prints anything itself. It loads and
// saves through a `ConfigTransport` and reports outcomes through a
// `Notifier`, so front ends and tests can swap either one.

use std::future::Future;

use scribe_api::{ConfigDocument, ConfigPatch, DeviceClient};

use crate::error::CoreError;

/// Source and sink for the device configuration document.
pub trait ConfigTransport: Send + Sync + 'static {
    /// Fetch the full configuration document.
    fn load_configuration(
        &self,
    ) -> impl Future<Output = Result<ConfigDocument, CoreError>> + Send;

    /// Send a partial document. Resolves to the device's confirmation text.
    fn save_configuration(
        &self,
        patch: &ConfigPatch,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

impl ConfigTransport for DeviceClient {
    async fn load_configuration(&self) -> Result<ConfigDocument, CoreError> {
        Ok(self.get_config().await?)
    }

    async fn save_configuration(&self, patch: &ConfigPatch) -> Result<String, CoreError> {
        Ok(self.save_config(patch).await?)
    }
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// User-facing message channel (toast, status line, stderr).
pub trait Notifier: Send + Sync {
    fn show_message(&self, text: &str, severity: Severity);
}
