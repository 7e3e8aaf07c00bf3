//! Display-ready node tree produced by the renderer.

use std::collections::BTreeMap;

use serde::Serialize;

/// Elements that never carry children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A single node of a [`RenderTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderNode {
    /// An element with attributes and children.
    Element(RenderElement),
    /// A run of text.
    Text {
        /// Unescaped text content.
        text: String,
    },
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes, ordered by name.
    pub attrs: BTreeMap<String, String>,
    /// Child nodes.
    pub children: Vec<RenderNode>,
}

impl RenderElement {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style `class` setter, replacing any existing value.
    #[must_use]
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    /// Builder-style children setter.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `class` attribute, if any.
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    /// Whether this element is a void element.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

impl From<RenderElement> for RenderNode {
    fn from(element: RenderElement) -> Self {
        Self::Element(element)
    }
}

impl RenderNode {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The element, if this is an element node.
    pub fn as_element(&self) -> Option<&RenderElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text { .. } => None,
        }
    }

    /// The tag name, if this is an element node.
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag.as_str())
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(text),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(&escape_text(text)),
            Self::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');

                if el.is_void() {
                    return;
                }

                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }

    fn visit<'a>(&'a self, found: &mut Vec<&'a RenderElement>, tag: &str) {
        if let Self::Element(el) = self {
            if el.tag == tag {
                found.push(el);
            }
            for child in &el.children {
                child.visit(found, tag);
            }
        }
    }
}

/// The renderer's output: a forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
}

impl RenderTree {
    /// Wrap top-level nodes.
    pub fn new(nodes: Vec<RenderNode>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    /// Consume the tree, returning its top-level nodes.
    pub fn into_nodes(self) -> Vec<RenderNode> {
        self.nodes
    }

    /// Whether the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// All elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&RenderElement> {
        let mut found = Vec::new();
        for node in &self.nodes {
            node.visit(&mut found, tag);
        }
        found
    }

    /// First element with the given tag, in document order.
    pub fn find(&self, tag: &str) -> Option<&RenderElement> {
        self.find_all(tag).into_iter().next()
    }

    /// Concatenated text of the whole tree.
    pub fn text_content(&self) -> String {
        self.nodes.iter().map(RenderNode::text_content).collect()
    }

    /// Serialize the tree as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

/// Escape text content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

/// Escape a double-quoted attribute value.
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\u{a0}', "&nbsp;")
}
