// scribe-api: Async client for the printer controller's `/api/config` endpoint.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use models::{
    ButtonPatch, ButtonSection, ButtonsPatch, ButtonsSection, ConfigDocument, ConfigPatch,
    DevicePatch, DeviceSection, GpioSection, LedsPatch, LedsSection, SaveResponse,
};
pub use transport::{TlsMode, TransportConfig};
