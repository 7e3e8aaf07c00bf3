//! Content sources for batch rendering.
//!
//! A source yields rich-text items keyed by an identifier. Two local sources
//! are provided: a directory of HTML fragments and a CMS list export in JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Content source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Malformed JSON export.
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON export with an unexpected shape.
    #[error("invalid export {path}: {message}")]
    InvalidExport { path: PathBuf, message: String },
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// One rich-text item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Identifier, also the output file stem.
    pub id: String,
    /// Raw HTML, or `None` when the item has no rich text.
    pub content: Option<String>,
}

impl ContentItem {
    /// Create an item.
    pub fn new(id: impl Into<String>, content: Option<String>) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }
}

/// Something that yields content items.
pub trait ContentSource {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Load every item.
    fn items(&self) -> Result<Vec<ContentItem>>;
}

/// Every `*.html` file under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Item id: path relative to the root, `/`-separated, without extension.
    fn item_id(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl ContentSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn items(&self) -> Result<Vec<ContentItem>> {
        if !self.root.exists() {
            warn!(dir = %self.root.display(), "content directory does not exist");
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            // Skip hidden entries below the root
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }

            debug!(path = %path.display(), "reading fragment");
            let content = fs::read_to_string(path)?;
            items.push(ContentItem::new(self.item_id(path), Some(content)));
        }

        info!(dir = %self.root.display(), count = items.len(), "loaded fragments");
        Ok(items)
    }
}

/// A CMS list export: `{"contents": [...]}` or a bare array of objects.
#[derive(Debug, Clone)]
pub struct JsonExportSource {
    path: PathBuf,
    field: String,
}

impl JsonExportSource {
    /// Create a source reading the rich-text `field` of each object.
    pub fn new(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
        }
    }

    /// The rich-text field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Extract items from a parsed export.
    pub fn parse_value(&self, value: Value) -> Result<Vec<ContentItem>> {
        let entries = match serde_json::from_value(value) {
            Ok(Export::Wrapped { contents }) => contents,
            Ok(Export::Bare(entries)) => entries,
            Err(_) => {
                return Err(self.invalid(
                    "expected a \"contents\" array or a bare array of entries",
                ));
            }
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let ExportEntry { id, mut fields } = serde_json::from_value(entry)
                    .map_err(|e| self.invalid(format!("entry {index}: {e}")))?;
                let id = match id {
                    EntryId::Text(id) if id.is_empty() => {
                        return Err(self.invalid(format!("entry {index} has an empty id")));
                    }
                    EntryId::Text(id) => id,
                    EntryId::Number(n) => n.to_string(),
                };
                let content = match fields.remove(&self.field) {
                    Some(Value::String(html)) => Some(html),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        warn!(id = %id, field = %self.field, kind = %kind(&other), "ignoring non-string field");
                        None
                    }
                };
                Ok(ContentItem::new(id, content))
            })
            .collect()
    }

    fn invalid(&self, message: impl Into<String>) -> SourceError {
        SourceError::InvalidExport {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

impl ContentSource for JsonExportSource {
    fn describe(&self) -> String {
        format!("export {} (field {})", self.path.display(), self.field)
    }

    fn items(&self) -> Result<Vec<ContentItem>> {
        let text = fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&text).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;
        let items = self.parse_value(value)?;
        info!(path = %self.path.display(), count = items.len(), "loaded export");
        Ok(items)
    }
}

/// Top-level shape of a list export.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Export {
    Wrapped { contents: Vec<Value> },
    Bare(Vec<Value>),
}

/// One export entry. The rich-text field name is configurable, so every
/// field other than `id` is kept in `fields`.
#[derive(Debug, Deserialize)]
struct ExportEntry {
    id: EntryId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryId {
    Text(String),
    Number(Number),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
