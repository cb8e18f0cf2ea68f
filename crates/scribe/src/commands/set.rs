//! `scribe set`: edit the working copy, show the change set, save it.

use scribe_core::transport::ConfigTransport;
use scribe_core::{ConfigSession, CoreError, Role};

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

/// Apply every requested edit to the session's working copy.
fn apply<T: ConfigTransport>(session: &ConfigSession<T>, args: SetArgs) -> Result<(), CliError> {
    if let Some(owner) = args.owner {
        session.set_owner(owner)?;
    }
    if let Some(timezone) = args.timezone {
        session.set_timezone(timezone)?;
    }
    if let Some(pin) = args.serial_tx {
        session.assign(Role::SerialTx, Some(pin))?;
    }
    if let Some(pin) = args.led_pin {
        if !session.working_copy()?.indicator_strip_enabled {
            tracing::warn!("LED strip is disabled on the device; its pin will not be sent");
        }
        session.assign(Role::IndicatorStrip, Some(pin))?;
    }
    for button in args.buttons {
        session.assign(button.role, Some(button.pin))?;
    }
    Ok(())
}

pub async fn handle<T: ConfigTransport>(
    session: &ConfigSession<T>,
    args: SetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dry_run = args.dry_run;
    apply(session, args)?;

    let errors = session.validation_errors();
    if !errors.is_empty() {
        return Err(CoreError::Invalid { errors }.into());
    }

    if !session.has_changes() {
        if !global.quiet {
            eprintln!("No changes: the device already has these settings");
        }
        return Ok(());
    }

    let patch = session.diff_payload();
    // Table mode shows the exact request body; plain lists changed field keys.
    let rendered = output::render_single(
        &global.output,
        &patch,
        |p| output::render_json_pretty(p),
        |_| {
            session
                .changed_fields()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        },
    );

    output::print_output(&rendered, global.quiet);
    if dry_run {
        if !global.quiet {
            eprintln!("Dry run: nothing was sent");
        }
        return Ok(());
    }

    let outcome = session.save().await?;
    tracing::debug!(message = %outcome.message, "device accepted settings");
    Ok(())
}
