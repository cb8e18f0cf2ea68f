//! `scribe show`: settings, role assignments, and outstanding problems.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use scribe_core::transport::ConfigTransport;
use scribe_core::{
    ConfigSession, DeviceSettings, GpioPin, PinCatalog, PinConflict, Role, ValidationErrors,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── View model ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct DeviceView {
    settings: DeviceSettings,
    conflicts: Vec<PinConflict>,
    errors: ValidationErrors,
}

#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Pin")]
    pin: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Safe")]
    safe: String,
}

/// One row per role, in role order.
fn role_rows(settings: &DeviceSettings, catalog: &PinCatalog, color: bool) -> Vec<AssignmentRow> {
    settings
        .assignment
        .iter()
        .map(|(role, pin)| {
            let pin = pin.unwrap_or(GpioPin::NOT_CONNECTED);
            let descriptor = catalog.get(pin);
            let mut label = role.label().to_owned();
            if role == Role::IndicatorStrip && !settings.indicator_strip_enabled {
                label.push_str(" (disabled)");
            }
            AssignmentRow {
                role: label,
                pin: if pin.is_sentinel() {
                    "-".into()
                } else {
                    pin.number().to_string()
                },
                description: descriptor
                    .map_or_else(|| "Not in catalog".into(), |d| d.description.clone()),
                safe: output::flag(descriptor.is_some_and(|d| d.is_safe), false, color),
            }
        })
        .collect()
}

fn detail(view: &DeviceView, catalog: &PinCatalog, color: bool) -> String {
    let settings = &view.settings;
    let strip = if settings.indicator_strip_enabled {
        "enabled"
    } else {
        "disabled"
    };

    let mut out = String::new();
    let _ = writeln!(out, "Owner:     {}", settings.owner);
    let _ = writeln!(out, "Timezone:  {}", settings.timezone);
    let _ = writeln!(out, "LED strip: {strip}");
    out.push('\n');
    out.push_str(&output::render_table(&role_rows(settings, catalog, color)));

    if !view.errors.is_empty() {
        out.push_str("\n\nProblems:");
        for (field, message) in view.errors.iter() {
            let _ = write!(out, "\n  {field}: {message}");
        }
    }
    out
}

fn plain(view: &DeviceView) -> String {
    let mut lines = vec![
        format!("owner={}", view.settings.owner),
        format!("timezone={}", view.settings.timezone),
    ];
    for (role, pin) in view.settings.assignment.iter() {
        lines.push(format!("{role}={}", GpioPin::to_wire(GpioPin::normalize(pin))));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<T: ConfigTransport>(
    session: &ConfigSession<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let catalog = session.catalog()?;
    let view = DeviceView {
        settings: session.working_copy()?,
        conflicts: session.conflicts()?,
        errors: session.validation_errors(),
    };
    let color = output::should_color(&global.color, &std::io::stdout());

    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, &catalog, color),
        plain,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
