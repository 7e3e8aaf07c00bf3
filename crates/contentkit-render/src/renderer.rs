//! Sanitize-then-transform entry point.

use std::sync::LazyLock;

use contentkit_core::{Config, RenderConfig, SanitizerBackend};
use tracing::debug;

use crate::{
    sanitize::{HtmlSanitizer, RawContent, SanitizedContent, sanitizer_for},
    transform::Transformer,
    tree::RenderTree,
};

static DEFAULT_RENDERER: LazyLock<Renderer> = LazyLock::new(Renderer::default);

/// Render a fragment with the default configuration.
pub fn render<'a>(raw: impl Into<RawContent<'a>>) -> RenderTree {
    DEFAULT_RENDERER.render(raw)
}

/// Turns untrusted rich text into a [`RenderTree`].
///
/// A renderer is immutable once built and can be shared across threads.
#[derive(Debug)]
pub struct Renderer {
    sanitizer: Box<dyn HtmlSanitizer>,
    transformer: Transformer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(SanitizerBackend::default(), RenderConfig::default())
    }
}

impl Renderer {
    /// Create a renderer with the given sanitizer backend and transform options.
    #[must_use]
    pub fn new(backend: SanitizerBackend, render: RenderConfig) -> Self {
        Self::with_sanitizer(sanitizer_for(backend), render)
    }

    /// Create a renderer with a custom sanitizer.
    #[must_use]
    pub fn with_sanitizer(sanitizer: Box<dyn HtmlSanitizer>, render: RenderConfig) -> Self {
        debug!(sanitizer = sanitizer.name(), "creating renderer");
        Self {
            sanitizer,
            transformer: Transformer::new(render),
        }
    }

    /// Create a renderer from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sanitizer.backend, config.render.clone())
    }

    /// Name of the active sanitizer backend.
    pub fn sanitizer_name(&self) -> &'static str {
        self.sanitizer.name()
    }

    /// Sanitize without transforming.
    pub fn sanitize<'a>(&self, raw: impl Into<RawContent<'a>>) -> SanitizedContent {
        self.sanitizer.sanitize_content(raw.into())
    }

    /// Transform already-sanitized HTML.
    pub fn transform(&self, sanitized: &SanitizedContent) -> RenderTree {
        self.transformer.transform(sanitized.as_str())
    }

    /// Sanitize then transform.
    pub fn render<'a>(&self, raw: impl Into<RawContent<'a>>) -> RenderTree {
        let sanitized = self.sanitize(raw);
        if sanitized.is_empty() {
            return RenderTree::default();
        }
        self.transform(&sanitized)
    }
}
