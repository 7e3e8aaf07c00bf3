//! Rich-text transform dispatch.
//!
//! Walks a sanitized fragment and restyles a fixed set of tags. Each handled
//! tag maps to one rule in a static table; a rule either returns a
//! replacement node or declines, in which case the element is copied as-is
//! and its children are walked with the same table.

use std::{collections::HashMap, sync::LazyLock};

use contentkit_core::RenderConfig;
use scraper::{ElementRef, Html, Node};

use crate::{
    classes::class_names,
    tree::{RenderElement, RenderNode, RenderTree},
};

/// A replacement function: `Some` replaces the element, `None` keeps it.
type RuleFn = fn(&Transformer, ElementRef<'_>) -> Option<RenderNode>;

static RULES: LazyLock<HashMap<&'static str, RuleFn>> = LazyLock::new(|| {
    let rules: [(&'static str, RuleFn); 13] = [
        ("h2", heading2),
        ("h3", heading3),
        ("hr", divider),
        ("a", anchor),
        ("ol", ordered_list),
        ("ul", unordered_list),
        ("blockquote", blockquote),
        ("figure", figure),
        ("figcaption", figcaption),
        ("img", image),
        ("b", bold),
        ("br", line_break),
        ("p", paragraph),
    ];
    HashMap::from(rules)
});

/// Tags with a transform rule.
pub fn handled_tags() -> Vec<&'static str> {
    let mut tags: Vec<_> = RULES.keys().copied().collect();
    tags.sort_unstable();
    tags
}

/// Restyles sanitized HTML into a [`RenderTree`].
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: RenderConfig,
}

impl Transformer {
    /// Create a transformer with the given options.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// The transform options.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Parse a fragment and apply the rule table to every element.
    pub fn transform(&self, html: &str) -> RenderTree {
        if html.trim().is_empty() {
            return RenderTree::default();
        }

        let fragment = Html::parse_fragment(html);
        RenderTree::new(self.children(fragment.root_element()))
    }

    /// Transform all children of an element.
    fn children(&self, parent: ElementRef<'_>) -> Vec<RenderNode> {
        parent
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(RenderNode::text(&*text.text)),
                Node::Element(_) => ElementRef::wrap(child).map(|el| self.element(el)),
                _ => None,
            })
            .collect()
    }

    /// Dispatch one element through the rule table.
    fn element(&self, el: ElementRef<'_>) -> RenderNode {
        RULES
            .get(el.value().name())
            .and_then(|rule| rule(self, el))
            .unwrap_or_else(|| self.passthrough(el))
    }

    /// Copy an element with its attributes, walking its children.
    fn passthrough(&self, el: ElementRef<'_>) -> RenderNode {
        RenderElement {
            tag: el.value().name().to_string(),
            attrs: attributes(el),
            children: self.children(el),
        }
        .into()
    }

    /// Same tag, original attributes, fixed class, walked children.
    fn restyle(&self, el: ElementRef<'_>, class: &[&str]) -> RenderNode {
        RenderElement {
            tag: el.value().name().to_string(),
            attrs: attributes(el),
            children: self.children(el),
        }
        .with_class(class_names(class.iter().copied()))
        .into()
    }

    /// Same tag, attributes dropped, fixed class, walked children.
    fn restyle_bare(&self, el: ElementRef<'_>, class: &[&str]) -> RenderNode {
        RenderElement::new(el.value().name())
            .with_class(class_names(class.iter().copied()))
            .with_children(self.children(el))
            .into()
    }
}

fn attributes(el: ElementRef<'_>) -> std::collections::BTreeMap<String, String> {
    el.value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn heading2(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    // base, wide screens, narrow screens
    Some(t.restyle(el, &["text-lg font-bold", "xl:py-4", "py-3"]))
}

fn heading3(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle(el, &["text-base font-bold", "xl:py-3", "py-2"]))
}

fn divider(_: &Transformer, _: ElementRef<'_>) -> Option<RenderNode> {
    Some(
        RenderElement::new("hr")
            .with_class(class_names(["xl:my-4", "my-3"]))
            .into(),
    )
}

fn anchor(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle(el, &["underline"]))
}

fn ordered_list(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["list-decimal space-y-2 pl-5", "xl:py-4", "py-3"]))
}

fn unordered_list(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["list-disc space-y-2 pl-5", "xl:py-4", "py-3"]))
}

fn blockquote(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["border-l-2 pl-4"]))
}

fn figure(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["py-2"]))
}

fn figcaption(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["text-sm"]))
}

fn image(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    let mut img = RenderElement::new("img");
    img.attrs = attributes(el);

    // Appended verbatim, even when the source already has a query.
    if let Some(src) = img.attrs.get_mut("src") {
        src.push('?');
        src.push_str(&t.config.image_query);
    }
    img.attrs.entry("alt".to_string()).or_default();

    Some(img.with_class("h-auto w-full").into())
}

fn bold(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    Some(t.restyle_bare(el, &["font-bold"]))
}

fn line_break(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    (el.value().attr("class") == Some(t.config.mobile_break_class.as_str()))
        .then(|| RenderElement::new("br").with_class("xl:hidden").into())
}

fn paragraph(t: &Transformer, el: ElementRef<'_>) -> Option<RenderNode> {
    if el.children().next().is_none() {
        return Some(RenderElement::new("br").into());
    }
    Some(
        RenderElement {
            tag: "p".to_string(),
            attrs: attributes(el),
            children: t.children(el),
        }
        .into(),
    )
}
