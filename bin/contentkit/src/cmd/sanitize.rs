//! Sanitize command - strip unsafe markup without restyling

use std::path::Path;

use color_eyre::eyre::Result;
use contentkit_render::Renderer;

use super::{load_config, read_input};

/// Run the sanitize command.
pub fn run(config_path: &Path, file: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let renderer = Renderer::from_config(&config);
    tracing::info!(?file, sanitizer = renderer.sanitizer_name(), "Sanitizing fragment");

    let input = read_input(file)?;
    println!("{}", renderer.sanitize(input.as_str()));

    Ok(())
}
