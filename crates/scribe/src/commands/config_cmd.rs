//! Config subcommand handlers. None of these talk to a device.

use scribe_config::{Config, Profile};
use scribe_core::DeviceConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("serialization failed: {e}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            address,
            name,
            force,
        } => {
            // Reject unusable addresses before they reach the file.
            let device = DeviceConfig::parse(&address)?;

            let mut cfg = scribe_config::load_config_or_default();
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::Conflict {
                    resource_type: "Profile".into(),
                    identifier: name,
                });
            }

            cfg.profiles.insert(
                name.clone(),
                Profile {
                    device: device.url.to_string(),
                    insecure: None,
                    timeout: None,
                },
            );
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }

            let path = scribe_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' -> {} written to {}", device.url, path.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = scribe_config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, render_toml, |c| {
                config::active_profile_name(global, c)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", scribe_config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = scribe_config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: scribe config init <ADDRESS>");
                return Ok(());
            }
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let mut names: Vec<(&String, &Profile)> = cfg.profiles.iter().collect();
            names.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (name, profile) in names {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}\t{}", profile.device);
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = scribe_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            scribe_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
