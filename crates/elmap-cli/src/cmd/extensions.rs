use anyhow::Result;
use elmap_core::capabilities::describe_extensions;
use elmap_core::config::ExtensionMode;
use elmap_core::detect_extensions;
use serde::Serialize;
use std::path::Path;

use crate::output::{self, OutputMode};

#[derive(Debug, Serialize)]
struct ExtensionRow {
    name: &'static str,
    detected: bool,
    mode: ExtensionMode,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    effect: Option<&'static str>,
}

/// Show which extensions were detected and which take part in resolution.
pub fn run_extensions(db: Option<&Path>, config: Option<&Path>, mode: OutputMode) -> Result<()> {
    let conn = super::open_store(db)?;
    let config = super::load_config(config)?;

    let detected = detect_extensions(&conn);
    let effective = detected.apply(&config.extensions);
    let modes = [config.extensions.commerce, config.extensions.nested_blocks];

    let rows: Vec<ExtensionRow> = describe_extensions(&detected)
        .into_iter()
        .zip(describe_extensions(&effective))
        .zip(modes)
        .map(|((detected, effective), mode)| ExtensionRow {
            name: effective.name,
            detected: detected.active,
            mode,
            active: effective.active,
            effect: (!effective.active).then_some(effective.effect),
        })
        .collect();

    output::render_mode(
        mode,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(
                    w,
                    "{}\t{}\t{}",
                    row.name,
                    if row.active { "active" } else { "inactive" },
                    mode_label(row.mode)
                )?;
            }
            Ok(())
        },
        |rows, w| {
            output::pretty_section(w, "Extensions")?;
            for row in rows {
                let state = if row.active { "active" } else { "inactive" };
                let source = match (row.mode, row.detected) {
                    (ExtensionMode::Auto, true) => "detected",
                    (ExtensionMode::Auto, false) => "not installed",
                    (ExtensionMode::On | ExtensionMode::Off, _) => "forced by config",
                };
                writeln!(w, "  {:<14} {:<9} ({source})", row.name, state)?;
                if let Some(effect) = row.effect {
                    writeln!(w, "  {:<14} {effect}", "")?;
                }
            }
            Ok(())
        },
    )
}

const fn mode_label(mode: ExtensionMode) -> &'static str {
    match mode {
        ExtensionMode::Auto => "auto",
        ExtensionMode::On => "on",
        ExtensionMode::Off => "off",
    }
}
