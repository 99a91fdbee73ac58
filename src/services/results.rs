//! Result reporting and finalization.
//!
//! Both operations run under the match's event lock: reporting writes one
//! match, finalization additionally cascades into downstream matches and
//! tries to place any match the cascade fully resolved.

use crate::api::MatchId;
use crate::db::repository::{EventRepository, RepositoryError};
use crate::models::{Match, Scoreline, ScoringConfig};
use crate::scheduler::allocator;
use crate::scheduler::error::ValidationError;
use crate::scheduler::progression;

/// Result-service failure.
#[derive(Debug, thiserror::Error)]
pub enum ResultError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Record a reported scoreline on a match, optionally finalizing it in the
/// same call.
pub async fn report_match_result(
    repository: &dyn EventRepository,
    match_id: MatchId,
    scoreline: Scoreline,
    config: &ScoringConfig,
    finalize: bool,
    override_final: bool,
) -> Result<Match, ResultError> {
    let reported = {
        let probe = repository.load_match(match_id).await?;
        let _lock = repository.acquire_event_lock(probe.event_id).await?;

        // Reload under the lock; the probe may be stale.
        let mut m = repository.load_match(match_id).await?;
        progression::report_result(&mut m, scoreline, config, override_final)?;
        repository.update_match(m).await?
    };

    if finalize {
        return finalize_match(repository, match_id, config, override_final).await;
    }
    Ok(reported)
}

/// Finalize a reported match and apply its consequences.
///
/// Cascade failures after the status write are surfaced as errors, but a
/// resolved match that still cannot be placed is not one: it stays
/// unplaced with a warning and can be placed manually.
pub async fn finalize_match(
    repository: &dyn EventRepository,
    match_id: MatchId,
    config: &ScoringConfig,
    override_final: bool,
) -> Result<Match, ResultError> {
    let probe = repository.load_match(match_id).await?;
    let _lock = repository.acquire_event_lock(probe.event_id).await?;

    let event = repository.load_event_with_relations(probe.event_id).await?;
    let mut matches = repository.load_matches_by_event(probe.event_id).await?;
    let index = matches
        .iter()
        .position(|m| m.id == Some(match_id))
        .ok_or(ValidationError::UnknownMatch { match_id })?;

    let outcome = progression::finalize(&mut matches[index], config, override_final)?;
    let report = progression::cascade_finalized(
        &mut matches,
        index,
        &outcome,
        &event,
        config,
        override_final,
    )?;

    for &unplaced in &report.resolved_unplaced {
        match allocator::allocate_unplaced(&event, &matches, unplaced) {
            Some(assignment) => {
                let m = &mut matches[unplaced];
                m.field_id = Some(assignment.field_id);
                m.start = Some(assignment.start);
                m.end = Some(assignment.end);
            }
            None => {
                log::warn!(
                    "match {:?} resolved by cascade but no availability remains; leaving unplaced",
                    matches[unplaced].id
                );
            }
        }
    }

    repository.update_match(matches[index].clone()).await?;
    for &touched in &report.touched {
        repository.update_match(matches[touched].clone()).await?;
    }

    Ok(matches[index].clone())
}
