//! Config file creation.

use anyhow::{Context, bail};
use std::path::Path;

use crate::config::{self, Config};

/// Write a default config file to `path` or the default location.
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path().context("Could not determine config directory")?,
    };

    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    config::save(&Config::default(), &path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
