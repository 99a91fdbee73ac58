//! Standings queries.

use crate::api::{DivisionId, EventId};
use crate::db::repository::{EventRepository, RepositoryError, RepositoryResult};
use crate::models::ScoringConfig;
use crate::scheduler::progression::{self, StandingsRow};

/// Current standings of one division, computed from finalized rotation
/// matches. Read-only; no lock needed.
pub async fn division_standings(
    repository: &dyn EventRepository,
    event_id: EventId,
    division_id: DivisionId,
    config: &ScoringConfig,
) -> RepositoryResult<Vec<StandingsRow>> {
    let event = repository.load_event_with_relations(event_id).await?;
    if event.division(division_id).is_none() {
        return Err(RepositoryError::not_found(format!(
            "division {} does not belong to event {}",
            division_id, event_id
        )));
    }
    let matches = repository.load_matches_by_event(event_id).await?;
    Ok(progression::standings(&event, division_id, &matches, config))
}
