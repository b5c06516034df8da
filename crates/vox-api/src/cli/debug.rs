//! `vox debug config`: show the configuration vox is running with.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use vox_types::config::VoxConfig;

pub fn print_config(config: &VoxConfig, path: &Path) -> Result<()> {
    write_config(config, path, &mut std::io::stdout())
}

/// Render `config` as TOML with every credential redacted.
pub fn write_config(config: &VoxConfig, path: &Path, out: &mut impl Write) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("could not render configuration")?;
    writeln!(out, "# {}", path.display())?;
    write!(out, "{rendered}")?;
    Ok(())
}
