// ABOUTME: Rule-driven listing-page extraction producing normalized NewsItems.
// ABOUTME: Selects container blocks, resolves per-field selectors scoped within each block.

//! Rule-driven extraction.
//!
//! Key behaviors:
//! - Containers are matched in document order and capped at the rule's
//!   `max_items`.
//! - Field selectors are resolved *within* each container match; the first
//!   non-empty match wins.
//! - A missing field degrades to its sentinel (`"No Title"` / `"#"`) or to
//!   `None` for images; it never drops the item.
//! - Extracted text is whitespace-normalized; links and images are
//!   resolved against the rule's base URL when relative.

use scraper::ElementRef;
use scraper::Html;
use tracing::debug;
use url::Url;

use crate::extractors::compiled::get_or_compile;
use crate::extractors::rules::{parse_selector, ExtractionRule, SelectorSpec};
use crate::item::{NewsItem, NO_LINK, NO_TITLE};

/// Normalizes whitespace by collapsing runs into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Applies a rule to page content, producing at most `max_items` items.
///
/// No container match is a valid, common outcome (layout drift) and
/// returns an empty vec rather than an error.
pub fn extract_items(html: &str, source_id: &str, rule: &ExtractionRule) -> Vec<NewsItem> {
    let container = match get_or_compile(&rule.container) {
        Some(sel) => sel,
        None => {
            debug!(source = source_id, selector = %rule.container, "invalid container selector");
            return Vec::new();
        }
    };

    let doc = Html::parse_document(html);
    let base = rule.base_url.as_deref();

    doc.select(&container)
        .take(rule.max_items)
        .map(|block| {
            let title = select_field(&block, &rule.title, None)
                .unwrap_or_else(|| NO_TITLE.to_string());
            let url = select_field(&block, &rule.link, Some("href"))
                .map(|href| resolve_url(&href, base))
                .unwrap_or_else(|| NO_LINK.to_string());
            let image = rule
                .image
                .as_ref()
                .and_then(|spec| select_field(&block, spec, Some("src")))
                .map(|src| resolve_url(&src, base));

            NewsItem {
                source: source_id.to_string(),
                title,
                url,
                image,
            }
        })
        .collect()
}

/// Extracts one field's value from within a container element.
///
/// `default_attr` is the attribute implied by a plain CSS spec (`href` for
/// links, `src` for images, none for text fields). A `CssAttr` spec
/// overrides it. Returns the first non-empty match, or `None`.
fn select_field(block: &ElementRef<'_>, spec: &SelectorSpec, default_attr: Option<&str>) -> Option<String> {
    let (css, explicit_attr) = parse_selector(spec);
    let attr = explicit_attr.or(default_attr);
    let selector = get_or_compile(css)?;

    for el in block.select(&selector) {
        let value = match attr {
            Some(name) => el.value().attr(name).map(|v| v.trim().to_string()),
            None => Some(normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))),
        };
        if let Some(v) = value {
            if !v.is_empty() {
                return Some(v);
            }
        }
    }
    None
}

/// Resolves a possibly-relative URL against the rule's base URL.
///
/// Already-absolute values (scheme-carrying, including data URIs) pass
/// through. Without a base, relative values pass through unchanged; the
/// caller must tolerate them.
pub fn resolve_url(raw: &str, base: Option<&str>) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("data:") {
        return raw.to_string();
    }
    if let Some(base) = base {
        if let Ok(parsed) = Url::parse(base) {
            if let Ok(joined) = parsed.join(raw) {
                return joined.to_string();
            }
        }
    }
    raw.to_string()
}
