//! HTML sanitization.
//!
//! Two backends implement [`HtmlSanitizer`]:
//!
//! - [`TreeSanitizer`] parses into a full HTML5 tree with `ammonia` and keeps
//!   only allow-listed tags and attributes.
//! - [`StreamingSanitizer`] rewrites the token stream with `lol_html` against
//!   its own allow-list, and checks every kept attribute value for a script URL.
//!
//! Both keep `target` on anchors so CMS authors can open links in a new tab,
//! plus `aria-*`, `role` and `text-align` styling from the editor.
//! The backend is picked once from configuration with [`sanitizer_for`].

use std::{borrow::Cow, collections::HashSet, fmt};

use contentkit_core::SanitizerBackend;
use lol_html::{
    RewriteStrSettings, doc_comments, doc_text, element, html_content::ContentType, rewrite_str,
};
use tracing::{debug, warn};

/// Tags added to ammonia's default allow-list.
const EXTRA_TAGS: &[&str] = &["button"];

/// Attributes allowed on every tag.
const GENERIC_ATTRIBUTES: &[&str] = &["class", "id", "role", "style"];

/// Attribute prefixes allowed on every tag.
const GENERIC_ATTRIBUTE_PREFIXES: &[&str] = &["data-", "aria-"];

/// Properties that survive in `style` attributes.
const STYLE_PROPERTIES: &[&str] = &["text-align"];

/// Elements removed together with their content.
const CLEAN_CONTENT_TAGS: &[&str] = &["iframe"];

/// Tags the streaming backend keeps. Mirrors ammonia's defaults plus
/// [`EXTRA_TAGS`], so both backends agree on structure.
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "area", "article", "aside", "b", "bdi", "bdo", "blockquote", "br",
    "button", "caption", "center", "cite", "code", "col", "colgroup", "data", "dd", "del",
    "details", "dfn", "div", "dl", "dt", "em", "figcaption", "figure", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "i", "img", "ins", "kbd", "li", "map", "mark",
    "nav", "ol", "p", "pre", "q", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span",
    "strike", "strong", "sub", "summary", "sup", "table", "tbody", "td", "tfoot", "th", "thead",
    "time", "tr", "tt", "u", "ul", "var", "wbr",
];

/// Disallowed elements whose content goes with them. Every other
/// disallowed element is unwrapped and its children kept.
const DROP_CONTENT_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "frame", "frameset", "noscript", "noembed",
    "noframes", "template", "textarea", "title", "xmp", "plaintext", "select",
];

/// Attributes the streaming backend keeps, on any allowed tag.
const ALLOWED_ATTRIBUTES: &[&str] = &[
    "abbr", "align", "alt", "cite", "class", "colspan", "coords", "datetime", "dir", "headers",
    "height", "href", "hreflang", "id", "lang", "name", "open", "reversed", "role", "rowspan",
    "scope", "shape", "span", "src", "start", "summary", "target", "title", "type", "valign",
    "value", "width",
];

/// Attributes whose values are never used as URLs.
const URI_SAFE_ATTRIBUTES: &[&str] = &[
    "abbr", "alt", "class", "dir", "id", "lang", "name", "role", "summary", "title", "value",
];

/// URL schemes allowed in attribute values, compared after normalization.
const ALLOWED_SCHEMES: &[&str] = &[
    "http:", "https:", "ftp:", "ftps:", "mailto:", "tel:", "callto:", "sms:", "cid:", "xmpp:",
];

/// Untrusted input; absent content is treated as empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawContent<'a>(Option<&'a str>);

impl<'a> RawContent<'a> {
    /// The input text, or `""` when absent.
    pub fn as_str(&self) -> &'a str {
        self.0.unwrap_or_default()
    }

    /// Whether the input was absent.
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

impl<'a> From<&'a str> for RawContent<'a> {
    fn from(value: &'a str) -> Self {
        Self(Some(value))
    }
}

impl<'a> From<&'a String> for RawContent<'a> {
    fn from(value: &'a String) -> Self {
        Self(Some(value.as_str()))
    }
}

impl<'a> From<Option<&'a str>> for RawContent<'a> {
    fn from(value: Option<&'a str>) -> Self {
        Self(value)
    }
}

/// HTML that has passed through a sanitizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedContent(String);

impl SanitizedContent {
    /// Borrow the sanitized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the sanitized markup.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether nothing survived sanitization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SanitizedContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability for removing script-executing constructs from HTML.
///
/// Implementations are pure and reentrant: the same input always gives the
/// same output, and sanitizing already-sanitized output is a no-op.
pub trait HtmlSanitizer: fmt::Debug + Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Sanitize an HTML fragment. Never fails.
    fn sanitize(&self, raw: &str) -> String;

    /// Sanitize possibly-absent input into [`SanitizedContent`].
    fn sanitize_content(&self, raw: RawContent<'_>) -> SanitizedContent {
        let raw = raw.as_str();
        if raw.is_empty() {
            return SanitizedContent::default();
        }
        SanitizedContent(self.sanitize(raw))
    }
}

/// Build the sanitizer for a configured backend.
pub fn sanitizer_for(backend: SanitizerBackend) -> Box<dyn HtmlSanitizer> {
    debug!(backend = backend.as_str(), "selecting sanitizer backend");
    match backend {
        SanitizerBackend::Tree => Box::new(TreeSanitizer::new()),
        SanitizerBackend::Streaming => Box::new(StreamingSanitizer::new()),
    }
}

/// Allow-list sanitizer over a full HTML5 tree.
#[derive(Debug)]
pub struct TreeSanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl TreeSanitizer {
    /// Create the sanitizer with the `target`-on-anchors extension.
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner
            .add_tags(EXTRA_TAGS)
            .add_tag_attributes("a", &["target"])
            .add_generic_attributes(GENERIC_ATTRIBUTES)
            .add_generic_attribute_prefixes(GENERIC_ATTRIBUTE_PREFIXES)
            .filter_style_properties(STYLE_PROPERTIES.iter().copied().collect::<HashSet<_>>())
            .add_clean_content_tags(CLEAN_CONTENT_TAGS)
            .link_rel(None);
        Self { cleaner }
    }
}

impl Default for TreeSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSanitizer for TreeSanitizer {
    fn name(&self) -> &'static str {
        SanitizerBackend::Tree.as_str()
    }

    fn sanitize(&self, raw: &str) -> String {
        self.cleaner.clean(raw).to_string()
    }
}

/// Allow-list rewriter over a streaming tokenizer.
///
/// Text is re-escaped on the way out, so removing an element can never splice
/// the text around it into new markup.
#[derive(Debug, Default)]
pub struct StreamingSanitizer;

impl StreamingSanitizer {
    /// Create the sanitizer.
    pub fn new() -> Self {
        Self
    }
}

impl HtmlSanitizer for StreamingSanitizer {
    fn name(&self) -> &'static str {
        SanitizerBackend::Streaming.as_str()
    }

    fn sanitize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let element_content_handlers = vec![element!("*", |el| {
            let tag = el.tag_name().to_ascii_lowercase();

            if !ALLOWED_TAGS.contains(&tag.as_str()) {
                if DROP_CONTENT_TAGS.contains(&tag.as_str()) {
                    el.remove();
                } else {
                    el.remove_and_keep_content();
                }
                return Ok(());
            }

            let attrs: Vec<(String, String)> = el
                .attributes()
                .iter()
                .map(|attr| (attr.name(), attr.value()))
                .collect();

            for (name, value) in attrs {
                match sanitize_attribute(&name.to_ascii_lowercase(), &value) {
                    None => el.remove_attribute(&name),
                    Some(Cow::Owned(filtered)) => el.set_attribute(&name, &filtered)?,
                    Some(Cow::Borrowed(_)) => {}
                }
            }
            Ok(())
        })];

        let document_content_handlers = vec![
            doc_text!(|text| {
                if text.as_str().contains('<') {
                    let escaped = text.as_str().replace('<', "&lt;");
                    text.replace(&escaped, ContentType::Html);
                }
                Ok(())
            }),
            doc_comments!(|comment| {
                comment.remove();
                Ok(())
            }),
        ];

        let result = rewrite_str(
            raw,
            RewriteStrSettings {
                element_content_handlers,
                document_content_handlers,
                ..RewriteStrSettings::new()
            },
        );

        match result {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, len = raw.len(), "streaming sanitizer could not rewrite input, dropping it");
                String::new()
            }
        }
    }
}

/// Decide what happens to one attribute of an allowed tag: `None` drops it,
/// a borrowed value keeps it, an owned value replaces it.
fn sanitize_attribute<'v>(name: &str, value: &'v str) -> Option<Cow<'v, str>> {
    if GENERIC_ATTRIBUTE_PREFIXES
        .iter()
        .any(|prefix| name.len() > prefix.len() && name.starts_with(prefix))
    {
        return Some(Cow::Borrowed(value));
    }

    if name == "style" {
        return filter_style(value);
    }

    if !ALLOWED_ATTRIBUTES.contains(&name) {
        return None;
    }

    (URI_SAFE_ATTRIBUTES.contains(&name) || is_allowed_uri(value)).then_some(Cow::Borrowed(value))
}

/// Keep only [`STYLE_PROPERTIES`] declarations with plain keyword values.
fn filter_style(value: &str) -> Option<Cow<'_, str>> {
    let declarations: Vec<&str> = value
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    let kept: Vec<&str> = declarations
        .iter()
        .copied()
        .filter(|d| is_allowed_declaration(d))
        .collect();

    if kept.is_empty() {
        None
    } else if kept.len() == declarations.len() {
        Some(Cow::Borrowed(value))
    } else {
        Some(Cow::Owned(kept.join("; ")))
    }
}

fn is_allowed_declaration(declaration: &str) -> bool {
    let Some((property, value)) = declaration.split_once(':') else {
        return false;
    };
    let value = value.trim();
    STYLE_PROPERTIES.contains(&property.trim().to_ascii_lowercase().as_str())
        && !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
}

/// Whether an attribute value is safe to keep as a URL: an allowed scheme,
/// or no scheme at all.
fn is_allowed_uri(value: &str) -> bool {
    let uri = normalize(value);
    if ALLOWED_SCHEMES.iter().any(|scheme| uri.starts_with(scheme)) {
        return true;
    }

    match uri.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return true,
    }

    let scheme_len = uri
        .find(|c: char| !(c.is_ascii_lowercase() || matches!(c, '+' | '.' | '-')))
        .unwrap_or(uri.len());
    !uri[scheme_len..].starts_with(':')
}

/// Decode character references, drop whitespace and control characters, and
/// lowercase, so `&#106;ava\nscript:` compares equal to `javascript:`.
fn normalize(value: &str) -> String {
    decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect()
}

fn decode_char_refs(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_one(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode one reference at the start of `s` (which begins with `&`).
fn decode_one(s: &str) -> Option<(char, usize)> {
    const NAMED: &[(&str, char)] = &[("colon;", ':'), ("tab;", '\t'), ("newline;", '\n')];

    let body = s.strip_prefix('&')?;

    if let Some(num) = body.strip_prefix('#') {
        let (digits, radix, prefix) = match num.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 3),
            None => (num, 10, 2),
        };
        let len = digits.chars().take_while(|c| c.is_digit(radix)).count();
        if len == 0 {
            return None;
        }
        let ch = u32::from_str_radix(&digits[..len], radix)
            .ok()
            .and_then(char::from_u32)?;
        let semi = usize::from(digits[len..].starts_with(';'));
        return Some((ch, prefix + len + semi));
    }

    NAMED.iter().find_map(|(name, ch)| {
        body.get(..name.len())
            .filter(|head| head.eq_ignore_ascii_case(name))
            .map(|_| (*ch, 1 + name.len()))
    })
}
