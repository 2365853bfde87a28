// ABOUTME: Source definitions and the immutable SourceRegistry keyed by source id.
// ABOUTME: Registry construction validates entries and fails fast on duplicate ids.

//! Source registry.
//!
//! A [`Source`] binds a stable identifier to a target URL and exactly one
//! extraction mode: a declarative [`ExtractionRule`] or a named custom
//! [`StrategyKind`]. The registry is populated once at startup and read
//! concurrently by requests; it is never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extractors::rules::ExtractionRule;
use crate::extractors::rules::SelectorSpec;
use crate::extractors::strategy::StrategyKind;

/// One external content provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Stable identifier, used for lookup and stamped on every item.
    pub id: String,
    /// Listing page to fetch.
    pub url: String,
    /// Declarative extraction rule (generic path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<ExtractionRule>,
    /// Named custom strategy for sources the rule model cannot express.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
}

/// Immutable registry of sources, preserving registration order.
#[derive(Debug, Default, Clone)]
pub struct SourceRegistry {
    map: HashMap<String, Source>,
    order: Vec<String>,
}

impl SourceRegistry {
    /// Builds a registry from source definitions.
    ///
    /// Duplicate ids fail fast with [`ConfigError::DuplicateSource`]
    /// rather than silently overwriting earlier entries; an id collision
    /// in configuration is always a mistake worth surfacing at startup.
    pub fn new(sources: Vec<Source>) -> Result<Self, ConfigError> {
        let mut registry = SourceRegistry::default();
        for source in sources {
            validate(&source)?;
            if registry.map.contains_key(&source.id) {
                return Err(ConfigError::DuplicateSource(source.id));
            }
            registry.order.push(source.id.clone());
            registry.map.insert(source.id.clone(), source);
        }
        Ok(registry)
    }

    /// Parses a JSON array of sources and builds a registry from it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let sources: Vec<Source> = serde_json::from_str(json).map_err(ConfigError::parse)?;
        Self::new(sources)
    }

    /// Looks up a source by id.
    pub fn get(&self, id: &str) -> Option<&Source> {
        self.map.get(id)
    }

    /// Source ids in registration order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every CSS selector referenced by rule-driven sources.
    ///
    /// Feed these to [`crate::extractors::precompile_selectors`] at startup
    /// to warm the shared selector cache.
    pub fn rule_selectors(&self) -> Vec<String> {
        let mut out = Vec::new();
        for id in &self.order {
            let Some(rule) = self.map[id].rule.as_ref() else {
                continue;
            };
            out.push(rule.container.clone());
            for spec in [Some(&rule.title), Some(&rule.link), rule.image.as_ref()]
                .into_iter()
                .flatten()
            {
                match spec {
                    SelectorSpec::Css(css) => out.push(css.clone()),
                    SelectorSpec::CssAttr(parts) => {
                        if let Some(css) = parts.first() {
                            out.push(css.clone());
                        }
                    }
                }
            }
        }
        out
    }
}

fn validate(source: &Source) -> Result<(), ConfigError> {
    if source.id.trim().is_empty() {
        return Err(ConfigError::invalid_source("<unnamed>", "id must not be empty"));
    }
    if source.url.trim().is_empty() {
        return Err(ConfigError::invalid_source(&source.id, "url must not be empty"));
    }
    match (&source.rule, &source.strategy) {
        (None, None) => Err(ConfigError::invalid_source(
            &source.id,
            "one of rule or strategy is required",
        )),
        (Some(_), Some(_)) => Err(ConfigError::invalid_source(
            &source.id,
            "rule and strategy are mutually exclusive",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::rules::SelectorSpec;

    fn rule_source(id: &str) -> Source {
        Source {
            id: id.into(),
            url: format!("https://{id}.example/news"),
            rule: Some(ExtractionRule {
                container: "article".into(),
                title: SelectorSpec::Css("h2 a".into()),
                link: SelectorSpec::Css("h2 a".into()),
                image: Some(SelectorSpec::Css("img".into())),
                base_url: None,
                max_items: 5,
            }),
            strategy: None,
        }
    }

    #[test]
    fn registers_and_looks_up_sources() {
        let registry = SourceRegistry::new(vec![rule_source("a"), rule_source("b")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn ids_preserve_registration_order() {
        let registry =
            SourceRegistry::new(vec![rule_source("c"), rule_source("a"), rule_source("b")])
                .unwrap();
        assert_eq!(registry.ids(), &["c".to_string(), "a".into(), "b".into()]);
    }

    #[test]
    fn duplicate_id_fails_fast() {
        let err = SourceRegistry::new(vec![rule_source("a"), rule_source("a")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource(id) if id == "a"));
    }

    #[test]
    fn source_requires_exactly_one_mode() {
        let mut neither = rule_source("x");
        neither.rule = None;
        assert!(SourceRegistry::new(vec![neither]).is_err());

        let mut both = rule_source("y");
        both.strategy = Some(StrategyKind::TrendingRepos);
        assert!(SourceRegistry::new(vec![both]).is_err());
    }

    #[test]
    fn empty_id_or_url_rejected() {
        let mut no_id = rule_source("");
        no_id.url = "https://example.com".into();
        assert!(SourceRegistry::new(vec![no_id]).is_err());

        let mut no_url = rule_source("z");
        no_url.url = "  ".into();
        assert!(SourceRegistry::new(vec![no_url]).is_err());
    }

    #[test]
    fn from_json_surfaces_parse_errors() {
        let err = SourceRegistry::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rule_selectors_cover_all_fields() {
        let registry = SourceRegistry::new(vec![rule_source("a")]).unwrap();
        let selectors = registry.rule_selectors();
        assert!(selectors.contains(&"article".to_string()));
        assert!(selectors.contains(&"h2 a".to_string()));
        assert!(selectors.contains(&"img".to_string()));
    }
}
