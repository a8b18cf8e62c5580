// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use contact::ContactConfig;
use std::path::Path;

pub fn check_command(config_path: Option<&Path>) -> Result<()> {
    let config = ContactConfig::from_process_env(config_path)
        .context("Configuration is invalid")?;

    print!("{}", render_report(&config));
    Ok(())
}

/// Human-readable summary; secrets are redacted by the config's Debug impl.
fn render_report(config: &ContactConfig) -> String {
    let mut out = format!("Configuration OK\n{config:#?}\n");
    let warnings = config.warnings();
    if warnings.is_empty() {
        out.push_str("No warnings.\n");
    } else {
        out.push_str(&format!("{} warning(s):\n", warnings.len()));
        for warning in warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }
    out
}
