//! Render command - sanitize and restyle one fragment

use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use contentkit_render::{RenderTree, Renderer};

use super::{load_config, read_input};

/// Output format for a rendered fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// HTML fragment
    #[default]
    Html,
    /// Render tree as JSON
    Json,
}

/// Run the render command.
///
/// Reads a fragment from `file` (or stdin) and prints the rendered result.
pub fn run(config_path: &Path, file: Option<&Path>, format: OutputFormat) -> Result<()> {
    tracing::info!(?config_path, ?file, ?format, "Rendering fragment");

    let config = load_config(config_path)?;
    let renderer = Renderer::from_config(&config);
    let input = read_input(file)?;

    let tree = renderer.render(input.as_str());
    println!("{}", format_tree(&tree, format)?);

    Ok(())
}

/// Serialize a tree in the requested format.
pub fn format_tree(tree: &RenderTree, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(tree.to_html()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(tree).wrap_err("Failed to serialize render tree")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_html() {
        let tree = contentkit_render::render("<hr>");
        assert_eq!(
            format_tree(&tree, OutputFormat::Html).unwrap(),
            r#"<hr class="xl:my-4 my-3">"#
        );
    }

    #[test]
    fn test_format_json() {
        let tree = contentkit_render::render("<b>x</b>");
        let json = format_tree(&tree, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["tag"], "b");
        assert_eq!(value[0]["attrs"]["class"], "font-bold");
        assert_eq!(value[0]["children"][0]["text"], "x");
    }

    #[test]
    fn test_format_empty_tree() {
        let tree = contentkit_render::render("");
        assert_eq!(format_tree(&tree, OutputFormat::Html).unwrap(), "");
        assert_eq!(format_tree(&tree, OutputFormat::Json).unwrap(), "[]");
    }
}
