// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use diagnostics::*;
use std::path::Path;

pub fn init_command(path: &Path) -> Result<()> {
    contact::create_example_config(path)
        .with_context(|| format!("Failed to create configuration file: {}", path.display()))?;

    let path = path.display().to_string();
    info!("Created example configuration file: {path}");
    info!("Edit the credentials, then run: contactd serve --config {path}");
    Ok(())
}
