// ABOUTME: Configuration options for the aggregation engine including Options and AggregatorBuilder.
// ABOUTME: AggregateRequest describes one aggregation pass (sample size, limit, shuffle, seed).

use std::collections::HashMap;
use std::time::Duration;

use crate::aggregate::Aggregator;
use crate::registry::SourceRegistry;

/// Default per-source fetch timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on concurrently in-flight source fetches.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Configuration options for the aggregation engine.
#[derive(Debug, Clone)]
pub struct Options {
    /// Per-source fetch timeout; one slow source never stalls the pass.
    pub timeout: Duration,
    /// Overall deadline for a pass. Sources still pending at the deadline
    /// are abandoned and recorded as timeouts; settled results are kept.
    pub deadline: Option<Duration>,
    pub user_agent: String,
    pub allow_private_networks: bool,
    /// Bound on simultaneously outstanding fetches.
    pub max_concurrency: usize,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub registry: Option<SourceRegistry>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            deadline: Some(Duration::from_secs(15)),
            user_agent: "newsdesk/0.1".to_string(),
            allow_private_networks: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            http_client: None,
            headers: HashMap::new(),
            registry: None,
        }
    }
}

/// Parameters of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRequest {
    /// How many distinct sources to query. Clamped to the registry size.
    pub sources: usize,
    /// Cap on total returned items.
    pub limit: usize,
    /// Randomize source selection and output order.
    pub shuffle: bool,
    /// Fixed RNG seed for reproducible selection/shuffling.
    pub seed: Option<u64>,
}

impl Default for AggregateRequest {
    fn default() -> Self {
        Self {
            sources: 8,
            limit: 15,
            shuffle: true,
            seed: None,
        }
    }
}

/// Builder for constructing [`Aggregator`] instances.
#[derive(Debug, Clone, Default)]
pub struct AggregatorBuilder {
    opts: Options,
}

impl AggregatorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-source fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set (or clear) the overall pass deadline.
    pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.opts.deadline = deadline;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Bound the number of concurrently in-flight source fetches.
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.opts.max_concurrency = n.max(1);
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the source registry.
    pub fn registry(mut self, registry: SourceRegistry) -> Self {
        self.opts.registry = Some(registry);
        self
    }

    /// Build the Aggregator with the configured options.
    pub fn build(self) -> Aggregator {
        Aggregator::new(self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_match_engine_conventions() {
        let req = AggregateRequest::default();
        assert_eq!(req.sources, 8);
        assert_eq!(req.limit, 15);
        assert!(req.shuffle);
        assert!(req.seed.is_none());
    }

    #[test]
    fn builder_applies_settings() {
        let aggregator = AggregatorBuilder::new()
            .timeout(Duration::from_millis(250))
            .deadline(None)
            .user_agent("test-agent/1.0")
            .allow_private_networks(true)
            .max_concurrency(2)
            .header("accept-language", "en")
            .build();
        let opts = aggregator.options();
        assert_eq!(opts.timeout, Duration::from_millis(250));
        assert!(opts.deadline.is_none());
        assert_eq!(opts.user_agent, "test-agent/1.0");
        assert!(opts.allow_private_networks);
        assert_eq!(opts.max_concurrency, 2);
        assert_eq!(opts.headers.get("accept-language").map(String::as_str), Some("en"));
    }

    #[test]
    fn max_concurrency_never_zero() {
        let aggregator = AggregatorBuilder::new().max_concurrency(0).build();
        assert_eq!(aggregator.options().max_concurrency, 1);
    }
}
