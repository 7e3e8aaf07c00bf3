//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use contentkit_core::{Calendar, Config, CurrentDateStyle};
use contentkit_render::{Renderer, Transformer};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and every fragment in the content directory.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate(config_path);

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    if !config_path.exists() {
        result.add_warning(format!(
            "Configuration file not found: {} (using defaults)",
            config_path.display()
        ));
        println!("  ⚠ Configuration file not found, using defaults");
    }

    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            return result;
        }
    };

    println!("\nChecking calendar...");
    match Calendar::from_config(&config.calendar) {
        Ok(calendar) => println!(
            "  ✓ UTC{} (today {})",
            calendar.offset(),
            calendar.current_date(CurrentDateStyle::Formatted)
        ),
        Err(e) => result.add_error(format!("Calendar error: {e}")),
    }

    println!("\nChecking output directory...");
    let output = Path::new(&config.build.output_dir);
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            config.build.output_dir
        ));
    } else {
        println!("  ✓ {}/ usable", config.build.output_dir);
    }

    let content_dir = Path::new(&config.build.content_dir);
    if content_dir.is_dir() {
        println!("\nChecking content files...");
        validate_content_files(content_dir, &config, &mut result);
    } else {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            config.build.content_dir
        ));
    }

    result
}

/// Validate all fragments in the given directory with the configured
/// sanitizer backend.
///
/// A fragment is flagged when its tree differs with and without sanitizing,
/// so re-serialization alone (attribute quoting, entity spelling) is not
/// reported, only removed markup.
fn validate_content_files(dir: &Path, config: &Config, result: &mut ValidationResult) {
    let renderer = Renderer::from_config(config);
    let transformer = Transformer::new(config.render.clone());
    let mut checked = 0;
    let mut flagged = 0;

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }

        checked += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                result.add_error(format!("{}: Failed to read file: {e}", path.display()));
                flagged += 1;
                continue;
            }
        };

        if content.trim().is_empty() {
            result.add_warning(format!("{}: Empty fragment", path.display()));
            flagged += 1;
        } else if transformer.transform(&content) != renderer.render(content.as_str()) {
            result.add_warning(format!(
                "{}: Markup will be removed by the {} sanitizer",
                path.display(),
                renderer.sanitizer_name()
            ));
            flagged += 1;
        }
    }

    if flagged == 0 {
        println!("  ✓ All {checked} fragments clean");
    } else {
        println!("  ⚠ {flagged}/{checked} fragments need attention");
    }
}
