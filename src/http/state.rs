//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::EventRepository;
use crate::models::ScoringConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn EventRepository>,
    /// Sport scoring rules from the engine config
    pub scoring: Arc<ScoringConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and
    /// scoring configuration.
    pub fn new(repository: Arc<dyn EventRepository>, scoring: ScoringConfig) -> Self {
        Self {
            repository,
            scoring: Arc::new(scoring),
        }
    }
}
