// ABOUTME: Loader for the builtin source registry from embedded JSON data.
// ABOUTME: Provides load_builtin_registry() to initialize the default SourceRegistry.

//! Builtin source registry loader.

use crate::registry::SourceRegistry;

/// Embedded JSON containing the builtin source definitions.
const BUILTIN_SOURCES_JSON: &str = include_str!("../data/sources.json");

/// Loads the builtin source registry from embedded JSON.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or violates registry
/// invariants (duplicate ids, missing extraction mode); the data ships
/// with the crate, so a failure here is a build defect, not runtime input.
pub fn load_builtin_registry() -> SourceRegistry {
    SourceRegistry::from_json(BUILTIN_SOURCES_JSON).expect("failed to parse builtin sources")
}
