//! Subcommand implementations.

pub mod build;
pub mod check;
pub mod render;
pub mod sanitize;

use std::{io::Read, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use contentkit_core::Config;

/// Load configuration with `CONTENTKIT__*` overrides, falling back to
/// defaults when the file is missing.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Read a fragment from a file, or from stdin when no file is given.
pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .wrap_err("Failed to read stdin")?;
            Ok(input)
        }
    }
}
