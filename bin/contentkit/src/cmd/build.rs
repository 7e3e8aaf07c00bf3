//! Build command - renders a whole content source

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr, bail};
use contentkit_core::Config;
use contentkit_render::{
    BatchRenderer, BatchStats, ContentSource, DirectorySource, JsonExportSource, Renderer,
};

/// Run the build command.
///
/// Renders every fragment of a content directory, or every item of a JSON
/// export, into the output directory.
pub fn run(
    config_path: &Path,
    content: Option<&Path>,
    export: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let output = output.map_or_else(|| PathBuf::from(&config.build.output_dir), Path::to_path_buf);
    let source = select_source(&config, content, export)?;
    tracing::info!(source = %source.describe(), ?output, "Starting build");

    let stats = build(&config, source.as_ref(), &output)?;
    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Items:      {}", stats.items);
    println!("  Empty:      {}", stats.empty);
    println!("  Failed:     {}", stats.failed);
    println!("  Written:    {} bytes", stats.bytes_written);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    if stats.failed > 0 {
        bail!("{} item(s) failed to render", stats.failed);
    }

    Ok(())
}

/// Pick the content source from CLI flags, defaulting to the configured
/// content directory.
pub fn select_source(
    config: &Config,
    content: Option<&Path>,
    export: Option<&Path>,
) -> Result<Box<dyn ContentSource>> {
    match (content, export) {
        (Some(_), Some(_)) => bail!("--content and --export cannot be used together"),
        (None, Some(export)) => Ok(Box::new(JsonExportSource::new(
            export,
            &config.build.content_field,
        ))),
        (Some(dir), None) => Ok(Box::new(DirectorySource::new(dir))),
        (None, None) => Ok(Box::new(DirectorySource::new(&config.build.content_dir))),
    }
}

/// Render `source` into `output` with a renderer built from `config`.
pub fn build(config: &Config, source: &dyn ContentSource, output: &Path) -> Result<BatchStats> {
    let renderer = Renderer::from_config(config);
    BatchRenderer::new(&renderer, output)
        .run(source)
        .wrap_err("Build failed")
}
