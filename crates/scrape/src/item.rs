// ABOUTME: NewsItem struct holding one normalized headline extracted from a source page.
// ABOUTME: Defines the sentinel fallbacks used when a field cannot be extracted.

use serde::{Deserialize, Serialize};

/// Fallback title used when the title selector matches nothing.
pub const NO_TITLE: &str = "No Title";

/// Fallback link used when the link selector matches nothing.
pub const NO_LINK: &str = "#";

/// One normalized, extracted content unit.
///
/// `title` and `url` are always present; unextractable fields fall back to
/// [`NO_TITLE`] / [`NO_LINK`] instead of dropping the item. `image` is
/// optional. When the producing source declares a base URL, `url` is
/// absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Identifier of the source that produced this item.
    pub source: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewsItem {
    /// True when the link selector matched nothing and the sentinel was used.
    pub fn has_placeholder_url(&self) -> bool {
        self.url == NO_LINK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_without_image_when_absent() {
        let item = NewsItem {
            source: "devto".into(),
            title: "Why lifetimes matter".into(),
            url: "https://dev.to/posts/1".into(),
            image: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("image"));
    }

    #[test]
    fn roundtrips_with_image() {
        let item = NewsItem {
            source: "infoq".into(),
            title: "Release notes".into(),
            url: "https://www.infoq.com/news/1".into(),
            image: Some("https://www.infoq.com/img/1.jpg".into()),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: NewsItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn placeholder_url_is_detected() {
        let item = NewsItem {
            source: "s".into(),
            title: NO_TITLE.into(),
            url: NO_LINK.into(),
            image: None,
        };
        assert!(item.has_placeholder_url());
    }
}
