// ABOUTME: Declarative extraction rule data model driving the generic listing-page extractor.
// ABOUTME: Defines SelectorSpec and ExtractionRule with serde support for sources JSON.

//! Declarative extraction rules.
//!
//! An [`ExtractionRule`] describes how to pull a list of items out of one
//! listing page: a container selector locating the repeating item blocks,
//! plus per-field selectors resolved *within* each container match.

use serde::{Deserialize, Serialize};

/// Specifies how to select one field's value from a container element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// A CSS selector string, e.g. "h2 a". The extracted value is the
    /// field's default (inner text for titles, `href` for links, `src`
    /// for images).
    Css(String),
    /// A CSS selector with explicit attribute extraction, e.g.
    /// ["img", "data-src"].
    CssAttr(Vec<String>),
}

impl Default for SelectorSpec {
    fn default() -> Self {
        SelectorSpec::Css(String::new())
    }
}

/// Parses a selector spec into a CSS selector string and optional attribute.
pub fn parse_selector(spec: &SelectorSpec) -> (&str, Option<&str>) {
    match spec {
        SelectorSpec::Css(css) => (css.as_str(), None),
        SelectorSpec::CssAttr(parts) => {
            if parts.len() >= 2 {
                (parts[0].as_str(), Some(parts[1].as_str()))
            } else if parts.len() == 1 {
                (parts[0].as_str(), None)
            } else {
                ("", None)
            }
        }
    }
}

fn default_max_items() -> usize {
    5
}

/// A complete declarative rule for one listing-page source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Selector identifying the repeating item blocks on the page.
    pub container: String,
    /// Title selector, scoped within each container match.
    pub title: SelectorSpec,
    /// Link selector, scoped within each container match.
    pub link: SelectorSpec,
    /// Optional image selector, scoped within each container match.
    #[serde(default)]
    pub image: Option<SelectorSpec>,
    /// Base URL used to resolve relative links and image paths.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Cap on containers processed per page, in document order.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}
