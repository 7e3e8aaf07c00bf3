//! Parallel rendering of a whole content source.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    renderer::Renderer,
    source::{ContentItem, ContentSource, SourceError},
};

/// Batch rendering errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Item id that cannot be used as an output path.
    #[error("invalid item id: {0:?}")]
    InvalidId(String),
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;

/// Batch rendering statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of items read from the source.
    pub items: usize,

    /// Items whose rendered tree was empty.
    pub empty: usize,

    /// Items that could not be written.
    pub failed: usize,

    /// Total bytes of HTML written.
    pub bytes_written: u64,

    /// Batch duration in milliseconds.
    pub duration_ms: u64,
}

/// Renders every item of a source into `<output>/<id>.html`.
#[derive(Debug)]
pub struct BatchRenderer<'r> {
    renderer: &'r Renderer,
    output_dir: PathBuf,
}

impl<'r> BatchRenderer<'r> {
    /// Create a batch renderer sharing `renderer` across workers.
    #[must_use]
    pub fn new(renderer: &'r Renderer, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// The output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load all items from `source` and render them.
    pub fn run(&self, source: &dyn ContentSource) -> Result<BatchStats> {
        info!(
            source = %source.describe(),
            output = %self.output_dir.display(),
            sanitizer = self.renderer.sanitizer_name(),
            "starting batch"
        );
        let items = source.items()?;
        self.render_items(&items)
    }

    /// Render already-loaded items.
    pub fn render_items(&self, items: &[ContentItem]) -> Result<BatchStats> {
        let start = Instant::now();
        fs::create_dir_all(&self.output_dir)?;

        let results: Vec<_> = items.par_iter().map(|item| self.render_item(item)).collect();

        let mut stats = BatchStats {
            items: items.len(),
            ..BatchStats::default()
        };
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok((bytes, empty)) => {
                    stats.bytes_written += bytes;
                    if empty {
                        stats.empty += 1;
                    }
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "failed to render item");
                    stats.failed += 1;
                }
            }
        }
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            items = stats.items,
            empty = stats.empty,
            failed = stats.failed,
            bytes = stats.bytes_written,
            duration_ms = stats.duration_ms,
            "batch complete"
        );

        Ok(stats)
    }

    /// Output path for an item id.
    pub fn output_path(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        let safe = !id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(BatchError::InvalidId(id.to_string()));
        }

        let mut path = self.output_dir.join(relative);
        let file_name = format!(
            "{}.html",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        path.set_file_name(file_name);
        Ok(path)
    }

    /// Render and write one item, returning bytes written and emptiness.
    fn render_item(&self, item: &ContentItem) -> Result<(u64, bool)> {
        let output_path = self.output_path(&item.id)?;
        let tree = self.renderer.render(item.content.as_deref());
        let html = tree.to_html();

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, &html)?;

        debug!(id = %item.id, path = %output_path.display(), nodes = tree.len(), "wrote item");
        Ok((html.len() as u64, tree.is_empty()))
    }
}
