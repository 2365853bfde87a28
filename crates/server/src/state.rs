// ABOUTME: Shared application state handed to every request handler.
// ABOUTME: Holds the aggregation engine and the server's fixed pass parameters.

use std::sync::Arc;

use newsdesk_scrape::{AggregateRequest, Aggregator};

/// Request-independent state shared across handlers.
///
/// The engine's registry is immutable after startup, so the whole state is
/// freely cloneable and read concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub request: AggregateRequest,
}

impl AppState {
    pub fn new(aggregator: Aggregator, request: AggregateRequest) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            request,
        }
    }
}
