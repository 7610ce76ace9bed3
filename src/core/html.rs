// src/core/html.rs
//! Minimal tree access the extractors need, so `specs` never touches a parser's
//! concrete types. `HtmlDoc` is the `scraper`-backed implementation.

use scraper::{CaseSensitivity, ElementRef, Html};

use crate::error::Result;

/// Read-only handle on one element of a parsed document.
///
/// All searches cover descendants only (never the node itself) and yield
/// results in document order.
pub trait DomNode: Sized {
    /// Every descendant whose tag name is one of `tags`.
    fn find_all_by_tag(&self, tags: &[&str]) -> Vec<Self>;

    /// First descendant carrying `class`, optionally restricted to `tag`.
    fn find_first_by_class(&self, tag: Option<&str>, class: &str) -> Option<Self>;

    /// Every descendant carrying `class`, any tag.
    fn find_all_by_class(&self, class: &str) -> Vec<Self>;

    /// Concatenated descendant text, trimmed at both ends. Inner spacing is kept.
    fn trimmed_text(&self) -> String;

    fn attr_value(&self, name: &str) -> Option<String>;
}

impl<'a> DomNode for ElementRef<'a> {
    fn find_all_by_tag(&self, tags: &[&str]) -> Vec<Self> {
        elements_below(*self)
            .filter(|el| tags.iter().any(|t| el.value().name().eq_ignore_ascii_case(t)))
            .collect()
    }

    fn find_first_by_class(&self, tag: Option<&str>, class: &str) -> Option<Self> {
        elements_below(*self).find(|el| {
            tag.is_none_or(|t| el.value().name().eq_ignore_ascii_case(t))
                && el.value().has_class(class, CaseSensitivity::CaseSensitive)
        })
    }

    fn find_all_by_class(&self, class: &str) -> Vec<Self> {
        elements_below(*self)
            .filter(|el| el.value().has_class(class, CaseSensitivity::CaseSensitive))
            .collect()
    }

    fn trimmed_text(&self) -> String {
        let raw: String = ElementRef::text(self).collect();
        s!(raw.trim())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

fn elements_below(node: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    node.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// A parsed vendor page.
pub struct HtmlDoc {
    html: Html,
}

impl HtmlDoc {
    /// html5ever recovers from any markup, so text input always yields a tree.
    pub fn parse(text: &str) -> Self {
        Self { html: Html::parse_document(text) }
    }

    /// Raw bytes as read from disk. Non-UTF-8 input is the one fatal case.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::parse(text))
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}
