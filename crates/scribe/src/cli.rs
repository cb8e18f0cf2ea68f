//! Clap derive structures for the `scribe` CLI.
//!
//! Defines the command tree, global flags, and shared value parsers.

use clap::{Args, Parser, Subcommand, ValueEnum};

use scribe_core::{GpioPin, Role};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// scribe -- settings console for Scribe printer controllers
#[derive(Debug, Parser)]
#[command(
    name = "scribe",
    version,
    about = "Inspect and edit Scribe printer controller settings",
    long_about = "Reads the device configuration over HTTP, shows which GPIO pins\n\
        each role may use, and writes back only the fields you change.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "SCRIBE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address (overrides profile), e.g. http://scribe.local
    #[arg(long, short = 'd', env = "SCRIBE_DEVICE", global = true)]
    pub device: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCRIBE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SCRIBE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SCRIBE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show device settings and GPIO role assignments
    Show,

    /// List the pins a role may take, with safety and ownership
    #[command(alias = "options")]
    Pins(PinsArgs),

    /// Change settings and save only what differs
    Set(SetArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Pins ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PinsArgs {
    /// Role to list options for: serial-tx, indicator-strip, button1..button4
    pub role: Role,

    /// Only show pins the role can take without a conflict
    #[arg(long, short = 'a')]
    pub available: bool,
}

// ── Set ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Device owner name
    #[arg(long)]
    pub owner: Option<String>,

    /// Timezone (IANA name, e.g. Europe/London)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Printer UART TX pin
    #[arg(long, value_name = "PIN")]
    pub serial_tx: Option<GpioPin>,

    /// LED strip data pin ("none" to disconnect)
    #[arg(long, value_name = "PIN")]
    pub led_pin: Option<GpioPin>,

    /// Button pin as N=PIN, e.g. --button 2=6 or --button 3=none
    #[arg(long = "button", short = 'b', value_name = "N=PIN", value_parser = parse_button)]
    pub buttons: Vec<ButtonAssignment>,

    /// Print the change set without sending it
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

/// One `--button N=PIN` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonAssignment {
    pub role: Role,
    pub pin: GpioPin,
}

fn parse_button(raw: &str) -> Result<ButtonAssignment, String> {
    let (number, pin) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=PIN, got '{raw}'"))?;
    let role = number
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Role::button)
        .ok_or_else(|| format!("button number must be 1-4, got '{number}'"))?;
    let pin = pin
        .parse::<GpioPin>()
        .map_err(|_| format!("invalid pin '{pin}'"))?;
    Ok(ButtonAssignment { role, pin })
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or replace a device profile
    Init {
        /// Device address, e.g. scribe.local or http://192.168.4.20
        address: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Replace an existing profile with the same name
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
