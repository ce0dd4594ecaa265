//! Application state for the HTTP server.

use std::sync::Arc;

use crate::algorithms::{CheckpointSet, RandomCongestion};
use crate::config::NavigationSettings;
use crate::db::repository::MapRepository;
use crate::services::{shared_congestion_source, CongestionFeed, SharedCongestionSource};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn MapRepository>,
    /// Locations whose inbound paths feed the congestion level
    pub checkpoints: Arc<CheckpointSet>,
    pub congestion_source: SharedCongestionSource,
    /// Broadcast of congestion refreshes for SSE subscribers
    pub congestion_feed: CongestionFeed,
}

impl AppState {
    /// Create a new application state with default checkpoints and an
    /// entropy-seeded congestion source.
    pub fn new(repository: Arc<dyn MapRepository>) -> Self {
        Self {
            repository,
            checkpoints: Arc::new(NavigationSettings::default().checkpoints()),
            congestion_source: shared_congestion_source(RandomCongestion::default()),
            congestion_feed: CongestionFeed::default(),
        }
    }

    pub fn with_checkpoints(mut self, checkpoints: CheckpointSet) -> Self {
        self.checkpoints = Arc::new(checkpoints);
        self
    }

    pub fn with_congestion_source(mut self, source: SharedCongestionSource) -> Self {
        self.congestion_source = source;
        self
    }

    pub fn with_congestion_feed(mut self, feed: CongestionFeed) -> Self {
        self.congestion_feed = feed;
        self
    }
}
