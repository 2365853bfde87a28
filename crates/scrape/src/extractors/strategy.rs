// ABOUTME: Pluggable extraction strategies for sources that do not fit the declarative rule model.
// ABOUTME: Dispatches between the generic rule-driven path and named custom implementations.

//! Extraction strategies.
//!
//! Most sources are covered by the declarative rule-driven path.
//! A small closed set of outliers needs bespoke logic (structural text
//! post-processing, fixed top-level container handling); those implement
//! [`ExtractStrategy`] and are selected by name via the source registry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extractors::compiled::get_or_compile;
use crate::extractors::select::{extract_items, resolve_url};
use crate::item::{NewsItem, NO_LINK, NO_TITLE};
use crate::registry::Source;

/// The capability "produce items from page content for source X".
///
/// Implementations obey the same contract as the rule-driven extractor:
/// bounded output, per-field degradation to sentinels, no panics on
/// malformed pages.
pub trait ExtractStrategy: Send + Sync {
    fn extract(&self, html: &str, source: &Source) -> Vec<NewsItem>;
}

/// Names a builtin custom strategy in sources JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Repository-trending pages: title text is collapsed to
    /// `owner/name` form and the image is a fixed site logo.
    TrendingRepos,
}

/// Resolves a strategy name to its implementation.
pub fn strategy_for(kind: StrategyKind) -> &'static dyn ExtractStrategy {
    match kind {
        StrategyKind::TrendingRepos => &TrendingRepos,
    }
}

/// Extracts items for a source, dispatching to its configured path.
///
/// Registry validation guarantees exactly one of rule/strategy is set;
/// a source that somehow carries neither yields an empty list.
pub fn extract_for_source(html: &str, source: &Source) -> Vec<NewsItem> {
    if let Some(kind) = source.strategy {
        return strategy_for(kind).extract(html, source);
    }
    if let Some(ref rule) = source.rule {
        return extract_items(html, &source.id, rule);
    }
    debug!(source = %source.id, "source has no extraction mode configured");
    Vec::new()
}

/// Containers processed per trending page.
const TRENDING_MAX_ITEMS: usize = 5;

/// Fixed logo stamped on trending items, which have no per-item artwork.
const TRENDING_IMAGE: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";

/// Trending-repository extraction.
///
/// The page lists repositories as `article.Box-row` blocks whose `h2`
/// text spreads `owner / name` across nested elements and indentation;
/// collapsing every whitespace run recovers the canonical `owner/name`.
struct TrendingRepos;

impl ExtractStrategy for TrendingRepos {
    fn extract(&self, html: &str, source: &Source) -> Vec<NewsItem> {
        let container = match get_or_compile("article.Box-row") {
            Some(sel) => sel,
            None => return Vec::new(),
        };
        let heading = match get_or_compile("h2 a") {
            Some(sel) => sel,
            None => return Vec::new(),
        };

        let doc = scraper::Html::parse_document(html);
        doc.select(&container)
            .take(TRENDING_MAX_ITEMS)
            .map(|block| {
                let anchor = block.select(&heading).next();
                let title = anchor
                    .map(|a| {
                        a.text()
                            .collect::<String>()
                            .chars()
                            .filter(|c| !c.is_whitespace())
                            .collect::<String>()
                    })
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_TITLE.to_string());
                let url = anchor
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| resolve_url(href, Some(&source.url)))
                    .unwrap_or_else(|| NO_LINK.to_string());

                NewsItem {
                    source: source.id.clone(),
                    title,
                    url,
                    image: Some(TRENDING_IMAGE.to_string()),
                }
            })
            .collect()
    }
}
