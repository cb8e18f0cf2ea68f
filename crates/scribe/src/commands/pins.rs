//! `scribe pins <ROLE>`: the options a role may choose from.

use tabled::Tabled;

use scribe_core::transport::ConfigTransport;
use scribe_core::{ConfigSession, PinOption};

use crate::cli::{GlobalOpts, PinsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PinRow {
    #[tabled(rename = "Pin")]
    pin: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Safe")]
    safe: String,
    #[tabled(rename = "Assigned To")]
    assigned_to: String,
    #[tabled(rename = "Available")]
    available: String,
}

fn to_row(option: &PinOption, color: bool) -> PinRow {
    PinRow {
        pin: if option.pin.is_sentinel() {
            "-".into()
        } else {
            option.pin.number().to_string()
        },
        description: option.description.clone(),
        safe: output::flag(option.is_safe, false, color),
        assigned_to: option
            .assigned_to
            .map_or_else(String::new, |role| role.label().to_owned()),
        available: output::flag(option.available, false, color),
    }
}

pub fn handle<T: ConfigTransport>(
    session: &ConfigSession<T>,
    args: &PinsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut options = session.options_for(args.role)?;
    if args.available {
        options.retain(|o| o.available);
    }
    tracing::debug!(role = %args.role, count = options.len(), "resolved pin options");

    let color = output::should_color(&global.color, &std::io::stdout());
    let out = output::render_list(
        &global.output,
        &options,
        |o| to_row(o, color),
        |o| o.pin.number().to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
