// ABOUTME: Main library entry point for the newsdesk multi-source extraction engine.
// ABOUTME: Re-exports the public API: Aggregator, AggregatorBuilder, NewsItem, errors, rules, registry.

//! newsdesk-scrape - a multi-source headline extraction and aggregation engine.
//!
//! This crate fetches listing pages from a configurable set of news
//! sources, applies each source's declarative extraction rule (or custom
//! strategy) to produce normalized items, and merges the per-source
//! results into one deduplicated, optionally shuffled, bounded list.
//! Individual source failures are isolated and never fail a pass.
//!
//! # Example
//!
//! ```no_run
//! use newsdesk_scrape::{AggregateRequest, Aggregator, ConfigError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ConfigError> {
//!     let aggregator = Aggregator::builder().build();
//!     let items = aggregator.aggregate(&AggregateRequest::default()).await?;
//!     for item in items {
//!         println!("[{}] {} <{}>", item.source, item.title, item.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod error;
pub mod extractors;
pub mod item;
pub mod loader;
pub mod options;
pub mod registry;
pub mod resource;

pub use crate::aggregate::{Aggregator, SourceOutcome};
pub use crate::error::{ConfigError, ErrorCode, ScrapeError};
pub use crate::extractors::{
    extract_for_source, extract_items, precompile_selectors, ExtractStrategy, ExtractionRule,
    SelectorSpec, StrategyKind,
};
pub use crate::item::{NewsItem, NO_LINK, NO_TITLE};
pub use crate::loader::load_builtin_registry;
pub use crate::options::{AggregateRequest, AggregatorBuilder, Options};
pub use crate::registry::{Source, SourceRegistry};
