// ABOUTME: Extraction module grouping the declarative rule model and strategies.
// ABOUTME: Re-exports the rule types, rule-driven extractor, and strategy dispatch.

pub mod compiled;
pub mod rules;
pub mod select;
pub mod strategy;

pub use compiled::{get_or_compile, precompile_selectors};
pub use rules::{parse_selector, ExtractionRule, SelectorSpec};
pub use select::{extract_items, resolve_url};
pub use strategy::{extract_for_source, strategy_for, ExtractStrategy, StrategyKind};
