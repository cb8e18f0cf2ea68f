// Device configuration HTTP client
//
// Wraps `reqwest::Client` with URL construction for the device's
// `/api/config` endpoint and translation of the device's JSON replies into
// typed results. The device answers a rejected write with a non-2xx status
// and `{ "success": false, "error": "..." }`.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ConfigDocument, ConfigPatch, SaveResponse};
use crate::transport::TransportConfig;

const CONFIG_PATH: &str = "api/config";

/// HTTP client for one printer controller.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// A cookie jar is added when the config has none, so the device's
    /// session cookie survives between the load and the save.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
        })
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn config_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(CONFIG_PATH)?)
    }

    // ── Endpoints ───────────────────────────────────────────────────

    /// `GET /api/config`: the full configuration document.
    pub async fn get_config(&self) -> Result<ConfigDocument, Error> {
        let url = self.config_url()?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }
        decode(&body)
    }

    /// `POST /api/config` with a partial document.
    ///
    /// Returns the device's confirmation message.
    pub async fn save_config(&self, patch: &ConfigPatch) -> Result<String, Error> {
        let url = self.config_url()?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(patch)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let reply: SaveResponse = decode(&body)?;
        if !reply.success {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: reply
                    .error
                    .unwrap_or_else(|| "device reported failure".into()),
            });
        }
        Ok(reply
            .message
            .unwrap_or_else(|| "Configuration saved".into()))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Ensure the base URL ends with `/` so `join` appends instead of replacing.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Build a `Rejected` error, preferring the device-supplied message.
fn rejection(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<SaveResponse>(body)
        .ok()
        .and_then(|r| r.error.or(r.message))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_owned()
            }
        });
    Error::Rejected { status, message }
}
