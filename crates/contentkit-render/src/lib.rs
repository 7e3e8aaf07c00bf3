//! contentkit Render Library
//!
//! Turns untrusted CMS rich text into a display-ready node tree: the fragment
//! is sanitized, then a fixed set of tags is restyled with utility classes.
//!
//! ```no_run
//! let tree = contentkit_render::render(r#"<h2>Title</h2><script>x()</script>"#);
//! assert!(tree.find("script").is_none());
//! println!("{}", tree.to_html());
//! ```

pub mod batch;
pub mod classes;
pub mod renderer;
pub mod sanitize;
pub mod source;
pub mod transform;
pub mod tree;

pub use batch::{BatchError, BatchRenderer, BatchStats};
pub use classes::class_names;
pub use renderer::{Renderer, render};
pub use sanitize::{
    HtmlSanitizer, RawContent, SanitizedContent, StreamingSanitizer, TreeSanitizer, sanitizer_for,
};
pub use source::{ContentItem, ContentSource, DirectorySource, JsonExportSource, SourceError};
pub use transform::{Transformer, handled_tags};
pub use tree::{RenderElement, RenderNode, RenderTree};
