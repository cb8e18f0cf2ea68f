//! `GlobalOpts`-aware wrappers over `scribe-config`.
//!
//! Flags beat environment, environment beats the profile, the profile beats
//! `[defaults]`.

use std::time::Duration;

use scribe_config::{Config, ConfigError, Profile};
use scribe_core::{DeviceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Name of the profile selected by `--profile`, the config default, or
/// `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the device to talk to from the config file and CLI overrides.
pub fn resolve_device_config(global: &GlobalOpts, cfg: &Config) -> Result<DeviceConfig, CliError> {
    let selected = cfg.profile(global.profile.as_deref());

    let mut device = match (&global.device, &selected) {
        (Some(address), _) => DeviceConfig::parse(address)?,
        (None, Ok((_, profile))) => scribe_config::profile_to_device_config(profile, &cfg.defaults)?,
        (None, Err(ConfigError::UnknownProfile { name })) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: name.clone(),
                available: available_profiles(cfg),
            });
        }
        (None, Err(_)) => {
            return Err(CliError::NoDevice {
                path: scribe_config::config_path().display().to_string(),
            });
        }
    };

    // An explicit address still takes timeout and TLS from the profile or defaults.
    if global.device.is_some() {
        let profile: Option<&Profile> = selected.as_ref().ok().map(|(_, p)| *p);
        device.timeout = Duration::from_secs(
            profile
                .and_then(|p| p.timeout)
                .unwrap_or(cfg.defaults.timeout),
        );
        if profile
            .and_then(|p| p.insecure)
            .unwrap_or(cfg.defaults.insecure)
        {
            device.tls = TlsVerification::DangerAcceptInvalid;
        }
    }
    if let Some(secs) = global.timeout {
        device.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        device.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(device)
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
