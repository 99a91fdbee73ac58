//! Repository trait for event schedule storage.
//!
//! The trait is the seam between the scheduling engine and storage:
//! implementations must be `Send + Sync`, and every mutation goes through
//! an explicit method so backends can make it atomic.

pub mod error;

use async_trait::async_trait;

use crate::api::{EventId, MatchId};
use crate::models::{Event, Match};

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Exclusive per-event guard held across a schedule or cascade mutation.
///
/// Dropping the guard releases the event. The in-memory backend backs this
/// with an owned tokio mutex guard; a database backend would hold an
/// advisory lock instead.
pub struct EventLock {
    _guard: tokio::sync::OwnedMutexGuard<()>,
}

impl EventLock {
    pub(crate) fn new(guard: tokio::sync::OwnedMutexGuard<()>) -> Self {
        Self { _guard: guard }
    }
}

impl std::fmt::Debug for EventLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EventLock")
    }
}

/// Repository trait for event and match storage.
#[async_trait]
pub trait EventRepository: Send + Sync {
    // ==================== Events ====================

    /// Load an event with its divisions, fields, time slots and teams.
    async fn load_event_with_relations(&self, event_id: EventId) -> RepositoryResult<Event>;

    /// Insert or update an event; returns the stored event with its id set.
    async fn save_event(&self, event: Event) -> RepositoryResult<Event>;

    /// List all stored events.
    async fn list_events(&self) -> RepositoryResult<Vec<Event>>;

    /// Delete an event and its matches.
    async fn delete_event(&self, event_id: EventId) -> RepositoryResult<()>;

    // ==================== Matches ====================

    /// Load a single match.
    async fn load_match(&self, match_id: MatchId) -> RepositoryResult<Match>;

    /// Load all matches of an event, ordered by (phase, round, sequence).
    async fn load_matches_by_event(&self, event_id: EventId) -> RepositoryResult<Vec<Match>>;

    /// Reserve `count` fresh match ids.
    ///
    /// Ids are handed out before the schedule write so the progression
    /// links between matches can be bound up front.
    async fn allocate_match_ids(&self, count: usize) -> RepositoryResult<Vec<MatchId>>;

    /// Atomically replace the event's full match set and store the new
    /// schedule checksum on the event. The matches must already carry ids
    /// from [`allocate_match_ids`].
    async fn replace_event_schedule(
        &self,
        event_id: EventId,
        matches: Vec<Match>,
        schedule_checksum: String,
    ) -> RepositoryResult<()>;

    /// Persist an updated match.
    async fn update_match(&self, m: Match) -> RepositoryResult<Match>;

    // ==================== Coordination ====================

    /// Acquire the exclusive per-event mutation lock.
    async fn acquire_event_lock(&self, event_id: EventId) -> RepositoryResult<EventLock>;

    /// Backend liveness probe.
    async fn health_check(&self) -> RepositoryResult<()>;
}
