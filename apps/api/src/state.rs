use std::sync::Arc;

use crate::config::Config;
use crate::ingest::extract::{DocumentTextExtractor, TextExtractor};
use crate::review::sessions::ReviewSessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Open import reviews, pruned by idle time.
    pub sessions: Arc<ReviewSessionStore>,
    /// Pluggable upload text extractor. Default: DocumentTextExtractor (PDF + plain text).
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = Arc::new(ReviewSessionStore::new(config.review_session_ttl()));
        Self {
            config,
            sessions,
            extractor: Arc::new(DocumentTextExtractor),
        }
    }
}
