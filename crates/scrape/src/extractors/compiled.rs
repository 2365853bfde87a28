// ABOUTME: Pre-compiled CSS selector cache for repeated DOM queries.
// ABOUTME: Eliminates re-parsing of rule selectors across requests.

//! Selector caching for efficient repeated DOM queries.
//!
//! Rule selectors are static per source but applied on every request.
//! This module compiles each selector once and shares the result behind a
//! RwLock, so the per-request cost is a map lookup.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Thread-safe cache of compiled CSS selectors.
///
/// Read-heavy: most accesses are cache hits under the shared lock, with
/// occasional misses requiring the exclusive lock.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
/// Invalid selectors are cached as `None` so malformed rules cost one
/// parse attempt, not one per request.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Another thread may have inserted while we compiled.
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles a batch of selectors into the cache.
///
/// Call during startup (after the source registry is built) to warm the
/// cache and avoid lock contention during extraction.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap();
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            let compiled = Selector::parse(css).ok();
            cache.insert(css.to_string(), compiled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_selector_is_cached() {
        assert!(get_or_compile("div.story-card").is_some());
        assert!(get_or_compile("div.story-card").is_some());
    }

    #[test]
    fn invalid_selector_returns_none() {
        assert!(get_or_compile("[[[nope").is_none());
        // Cached as None on the second call too.
        assert!(get_or_compile("[[[nope").is_none());
    }

    #[test]
    fn precompile_warms_cache() {
        precompile_selectors(["h2 a", ".post-card", "img[src]"]);
        assert!(get_or_compile("h2 a").is_some());
        assert!(get_or_compile(".post-card").is_some());
        assert!(get_or_compile("img[src]").is_some());
    }
}
