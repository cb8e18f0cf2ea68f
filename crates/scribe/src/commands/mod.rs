//! Command dispatch: bridges CLI args -> configuration session -> output.

pub mod config_cmd;
pub mod pins;
pub mod set;
pub mod show;

use std::sync::Arc;

use scribe_core::{ConfigSession, DeviceConfig};
use scribe_core::transport::ConfigTransport;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::notifier::ConsoleNotifier;

/// Open a session against the resolved device and load its configuration.
pub async fn connect<T: ConfigTransport>(
    transport: T,
    device: &DeviceConfig,
    global: &GlobalOpts,
) -> Result<ConfigSession<T>, CliError> {
    let session = ConfigSession::new(transport, Arc::new(ConsoleNotifier::new(global)));
    session
        .load()
        .await
        .map_err(|e| CliError::load_failed(device.url.as_str(), &e))?;
    Ok(session)
}

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, device: &DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let client = device.build_client()?;
    let session = connect(client, device, global).await?;
    tracing::debug!(url = %device.url, "configuration loaded");

    let result = match cmd {
        Command::Show => show::handle(&session, global),
        Command::Pins(args) => pins::handle(&session, &args, global),
        Command::Set(args) => set::handle(&session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    };
    session.close();
    result
}
