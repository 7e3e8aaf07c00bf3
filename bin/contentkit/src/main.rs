//! contentkit CLI
//!
//! Sanitizes and restyles CMS rich text into display-ready HTML.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use contentkit::cmd::render::OutputFormat;

/// Command-line interface for contentkit.
#[derive(Parser)]
#[command(
    name = "contentkit",
    version,
    about = "Render CMS rich text into sanitized, styled HTML"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "contentkit.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Render one fragment (reads stdin when no file is given)
    Render {
        /// Fragment file
        file: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },
    /// Print the sanitized fragment without restyling
    Sanitize {
        /// Fragment file
        file: Option<PathBuf>,
    },
    /// Render every fragment of a content source
    Build {
        /// Directory of *.html fragments (defaults to build.content_dir)
        #[arg(long, conflicts_with = "export")]
        content: Option<PathBuf>,
        /// CMS JSON export to render instead of a directory
        #[arg(long)]
        export: Option<PathBuf>,
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    contentkit::init_tracing(cli.verbose);

    match cli.command {
        Commands::Render { file, format } => {
            contentkit::cmd::render::run(&cli.config, file.as_deref(), format)?;
        }
        Commands::Sanitize { file } => {
            contentkit::cmd::sanitize::run(&cli.config, file.as_deref())?;
        }
        Commands::Build {
            content,
            export,
            output,
        } => {
            contentkit::cmd::build::run(
                &cli.config,
                content.as_deref(),
                export.as_deref(),
                output.as_deref(),
            )?;
        }
        Commands::Check { strict } => {
            contentkit::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
