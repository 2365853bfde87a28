// ABOUTME: The Aggregator that fans out fetch+extract across selected sources and merges results.
// ABOUTME: Handles source sampling, bounded concurrency, deadline cutoff, dedup, shuffle, and truncation.

//! Multi-source aggregation.
//!
//! One aggregation pass selects `k` distinct sources from the registry,
//! runs fetch+extract for each as an independent unit of work, and merges
//! the per-source item lists into one bounded result. Per-source failures
//! are isolated: they are logged, recorded on the source's outcome, and
//! never abort sibling sources or the pass itself. Only configuration
//! problems (empty registry, out-of-range request) surface as errors.

use std::collections::HashSet;
use std::net::ToSocketAddrs;
use std::pin::pin;

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ScrapeError};
use crate::extractors::strategy::extract_for_source;
use crate::item::{NewsItem, NO_LINK};
use crate::loader::load_builtin_registry;
use crate::options::{AggregateRequest, AggregatorBuilder, Options};
use crate::registry::SourceRegistry;
use crate::resource::{fetch, FetchOptions};

/// Result of one source's fetch+extract unit within a pass.
///
/// A failed source carries an empty item list plus the recorded failure
/// reason; it contributes nothing to the merged output.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    pub items: Vec<NewsItem>,
    pub error: Option<ScrapeError>,
}

impl SourceOutcome {
    fn failed(source: &str, error: ScrapeError) -> Self {
        Self {
            source: source.to_string(),
            items: Vec::new(),
            error: Some(error),
        }
    }
}

/// The aggregation engine.
///
/// Owns the source registry (immutable after construction), a shared HTTP
/// client, and engine options. Cheap to share behind an `Arc`; holds no
/// per-request state.
pub struct Aggregator {
    opts: Options,
    http_client: reqwest::Client,
    registry: SourceRegistry,
}

impl Aggregator {
    /// Create a builder for configuring an Aggregator.
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            let allow_private = opts.allow_private_networks;
            let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
                let next = attempt.url().clone();
                if !allow_private {
                    if let Some(host) = next.host_str() {
                        let scheme = next.scheme();
                        let port = next
                            .port()
                            .unwrap_or(if scheme == "https" { 443 } else { 80 });
                        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
                            if crate::resource::is_private_ip(&ip) {
                                return attempt.error("redirect to private IP blocked");
                            }
                        } else {
                            // synchronous DNS resolution; redirect policies cannot await
                            let addr_str = format!("{}:{}", host, port);
                            match addr_str.to_socket_addrs() {
                                Ok(addrs) => {
                                    for sa in addrs {
                                        if crate::resource::is_private_ip(&sa.ip()) {
                                            return attempt.error("redirect to private IP blocked");
                                        }
                                    }
                                }
                                Err(_) => {
                                    return attempt.error("DNS lookup failed during redirect");
                                }
                            }
                        }
                    }
                }
                attempt.follow()
            });

            reqwest::Client::builder()
                .redirect(redirect_policy)
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let registry = opts.registry.clone().unwrap_or_else(load_builtin_registry);

        Self {
            opts,
            http_client,
            registry,
        }
    }

    /// The engine's options.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// The source registry backing this engine.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Run one aggregation pass and return the merged, bounded item list.
    ///
    /// Never errors for per-source failures; a pass where every source
    /// fails returns `Ok` with an empty vec. Errors only for
    /// configuration problems.
    pub async fn aggregate(&self, req: &AggregateRequest) -> Result<Vec<NewsItem>, ConfigError> {
        let ids = self.select_sources(req)?;
        debug!(selected = ?ids, "sources selected");

        let outcomes = self.collect(&ids).await;

        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        let mut items: Vec<NewsItem> = outcomes.into_iter().flat_map(|o| o.items).collect();
        dedupe_by_url(&mut items);

        if req.shuffle {
            items.shuffle(&mut make_rng(req.seed));
        }
        items.truncate(req.limit);

        info!(
            sources = ids.len(),
            failed,
            items = items.len(),
            "aggregation pass complete"
        );
        Ok(items)
    }

    /// Run fetch+extract for each id, concurrently, tolerating failures.
    ///
    /// Concurrency is bounded by `max_concurrency`. When the engine has a
    /// deadline, sources still pending at the cutoff are abandoned and
    /// recorded as timeouts; outcomes that already settled are kept.
    /// Outcomes are returned in the order of `ids` (stable, independent
    /// of completion order).
    pub async fn collect(&self, ids: &[String]) -> Vec<SourceOutcome> {
        let mut slots: Vec<Option<SourceOutcome>> = Vec::new();
        slots.resize_with(ids.len(), || None);

        {
            let mut futs = Vec::with_capacity(ids.len());
            for (idx, id) in ids.iter().enumerate() {
                futs.push(async move { (idx, self.collect_source(id).await) });
            }
            let stream = stream::iter(futs).buffer_unordered(self.opts.max_concurrency);
            let mut stream = pin!(stream);

            let drain = async {
                while let Some((idx, outcome)) = stream.next().await {
                    slots[idx] = Some(outcome);
                }
            };
            match self.opts.deadline {
                Some(deadline) => {
                    if tokio::time::timeout(deadline, drain).await.is_err() {
                        warn!(?deadline, "aggregation deadline exceeded; abandoning pending sources");
                    }
                }
                None => drain.await,
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.unwrap_or_else(|| {
                    let id = ids[idx].as_str();
                    let url = self.registry.get(id).map(|s| s.url.as_str()).unwrap_or(id);
                    SourceOutcome::failed(
                        id,
                        ScrapeError::timeout(
                            url,
                            "Aggregate",
                            Some(anyhow::anyhow!("abandoned at pass deadline")),
                        ),
                    )
                })
            })
            .collect()
    }

    /// One self-contained fetch+extract unit.
    async fn collect_source(&self, id: &str) -> SourceOutcome {
        let Some(source) = self.registry.get(id) else {
            return SourceOutcome::failed(
                id,
                ScrapeError::extract(id, "Collect", Some(anyhow::anyhow!("unknown source id"))),
            );
        };

        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
            parse_non_200: false,
        };

        // The HTTP client carries the same timeout, but that only covers
        // the request itself; this bound covers DNS checks and decoding too.
        let fetched = tokio::time::timeout(
            self.opts.timeout,
            fetch(&self.http_client, &source.url, &fetch_opts),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ScrapeError::timeout(
                &source.url,
                "Fetch",
                Some(anyhow::anyhow!("source timed out")),
            ))
        });

        match fetched {
            Ok(page) => {
                let html = page.text();
                let items = extract_for_source(&html, source);
                debug!(source = id, count = items.len(), "source extracted");
                SourceOutcome {
                    source: id.to_string(),
                    items,
                    error: None,
                }
            }
            Err(err) => {
                warn!(source = id, error = %err, "source failed; continuing without it");
                SourceOutcome::failed(id, err)
            }
        }
    }

    /// Choose `k` distinct source ids for a pass.
    ///
    /// `k` beyond the registry size clamps to the registry size: a
    /// shrunken registry degrades the pass instead of failing it. With
    /// shuffle enabled, selection is a uniform sample; otherwise the
    /// first `k` ids in registration order (reproducible).
    fn select_sources(&self, req: &AggregateRequest) -> Result<Vec<String>, ConfigError> {
        if self.registry.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        if req.sources == 0 {
            return Err(ConfigError::InvalidRequest(
                "sources must be at least 1".into(),
            ));
        }
        if req.limit == 0 {
            return Err(ConfigError::InvalidRequest("limit must be at least 1".into()));
        }

        let all = self.registry.ids();
        let k = req.sources.min(all.len());
        if req.shuffle {
            let mut rng = make_rng(req.seed);
            let picked = rand::seq::index::sample(&mut rng, all.len(), k);
            Ok(picked.iter().map(|i| all[i].clone()).collect())
        } else {
            Ok(all[..k].to_vec())
        }
    }
}

/// Drop repeated URLs, keeping the first occurrence.
///
/// Sentinel links are exempt: two degraded items from different pages are
/// not the same story.
fn dedupe_by_url(items: &mut Vec<NewsItem>) {
    let mut seen = HashSet::new();
    items.retain(|item| item.url == NO_LINK || seen.insert(item.url.clone()));
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::rules::{ExtractionRule, SelectorSpec};
    use crate::registry::Source;
    use pretty_assertions::assert_eq;

    fn item(source: &str, url: &str) -> NewsItem {
        NewsItem {
            source: source.into(),
            title: format!("{url} title"),
            url: url.into(),
            image: None,
        }
    }

    fn test_registry(n: usize) -> SourceRegistry {
        let sources = (0..n)
            .map(|i| Source {
                id: format!("s{i}"),
                url: format!("https://s{i}.example/"),
                rule: Some(ExtractionRule {
                    container: "article".into(),
                    title: SelectorSpec::Css("h2".into()),
                    link: SelectorSpec::Css("a".into()),
                    image: None,
                    base_url: None,
                    max_items: 5,
                }),
                strategy: None,
            })
            .collect();
        SourceRegistry::new(sources).unwrap()
    }

    fn test_aggregator(n: usize) -> Aggregator {
        Aggregator::builder().registry(test_registry(n)).build()
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut items = vec![
            item("a", "https://x.example/1"),
            item("b", "https://x.example/1"),
            item("b", "https://x.example/2"),
        ];
        dedupe_by_url(&mut items);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "a");
    }

    #[test]
    fn dedupe_exempts_placeholder_links() {
        let mut items = vec![item("a", NO_LINK), item("b", NO_LINK)];
        dedupe_by_url(&mut items);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: Vec<u32> = {
            let mut rng = make_rng(Some(7));
            (0..4).map(|_| rand::Rng::random(&mut rng)).collect()
        };
        let b: Vec<u32> = {
            let mut rng = make_rng(Some(7));
            (0..4).map(|_| rand::Rng::random(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn selection_clamps_to_registry_size() {
        let aggregator = test_aggregator(3);
        let req = AggregateRequest {
            sources: 5,
            shuffle: false,
            ..Default::default()
        };
        let ids = aggregator.select_sources(&req).unwrap();
        assert_eq!(ids, vec!["s0".to_string(), "s1".into(), "s2".into()]);
    }

    #[test]
    fn selection_without_shuffle_is_registration_order() {
        let aggregator = test_aggregator(4);
        let req = AggregateRequest {
            sources: 2,
            shuffle: false,
            ..Default::default()
        };
        assert_eq!(
            aggregator.select_sources(&req).unwrap(),
            vec!["s0".to_string(), "s1".into()]
        );
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let aggregator = test_aggregator(8);
        let req = AggregateRequest {
            sources: 3,
            seed: Some(42),
            ..Default::default()
        };
        let first = aggregator.select_sources(&req).unwrap();
        let second = aggregator.select_sources(&req).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn selection_rejects_zero_sources_or_limit() {
        let aggregator = test_aggregator(2);
        let zero_sources = AggregateRequest {
            sources: 0,
            ..Default::default()
        };
        assert!(matches!(
            aggregator.select_sources(&zero_sources),
            Err(ConfigError::InvalidRequest(_))
        ));

        let zero_limit = AggregateRequest {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            aggregator.select_sources(&zero_limit),
            Err(ConfigError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn empty_registry_is_a_config_error() {
        let aggregator = Aggregator::builder()
            .registry(SourceRegistry::default())
            .build();
        let err = aggregator
            .aggregate(&AggregateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRegistry));
    }

    #[tokio::test]
    async fn unknown_id_in_collect_records_failure() {
        let aggregator = test_aggregator(1);
        let outcomes = aggregator.collect(&["nope".to_string()]).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].items.is_empty());
        assert!(outcomes[0].error.is_some());
    }
}
