//! Schedule orchestration.
//!
//! Runs the full pipeline for one event under its exclusive lock: load the
//! snapshot, validate the window, generate the abstract plan, allocate
//! occurrences, bind persistent ids and write the schedule atomically.
//! Every run replaces the stored matches wholesale, never incrementally;
//! re-running over an unchanged snapshot reproduces the stored checksum and
//! is reported as such, but the replacement (with fresh match ids) still
//! happens.

use std::collections::HashMap;

use crate::api::EventId;
use crate::db::repository::{EventRepository, RepositoryError};
use crate::db::schedule_checksum;
use crate::models::{Event, Match, MatchStatus};
use crate::scheduler::allocator::{self, AllocationMode, Assignment};
use crate::scheduler::error::ScheduleError;
use crate::scheduler::generator::{self, GeneratorOptions, MatchPlan, PlannedMatch};

/// Orchestrator failure: either a caller-fixable scheduling problem or a
/// storage fault.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Knobs for one schedule run. The allocation mode is required: callers
/// always say whether exhausted availability is tolerated.
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    pub mode: AllocationMode,
    pub generator: GeneratorOptions,
}

impl ScheduleOptions {
    pub fn commit() -> Self {
        Self {
            mode: AllocationMode::Commit,
            generator: GeneratorOptions::default(),
        }
    }

    pub fn preview() -> Self {
        Self {
            mode: AllocationMode::Preview,
            generator: GeneratorOptions::default(),
        }
    }
}

/// What a schedule run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// The event type never carries a schedule.
    NotSchedulable,
    /// The regenerated schedule is content-identical to the stored one.
    /// Matches were still replaced wholesale, under fresh ids.
    Unchanged { checksum: String },
    /// A new schedule was written.
    Written {
        checksum: String,
        match_count: usize,
        unplaced: usize,
    },
}

/// Run the schedule pipeline for an event.
///
/// Takes the event's exclusive lock for the full run, so concurrent
/// schedule requests for the same event serialize; the second run then
/// sees the first run's checksum and reports `Unchanged`.
pub async fn schedule_event(
    repository: &dyn EventRepository,
    event_id: EventId,
    options: &ScheduleOptions,
) -> Result<ScheduleOutcome, OrchestratorError> {
    let _lock = repository.acquire_event_lock(event_id).await?;
    let event = repository.load_event_with_relations(event_id).await?;

    if !event.event_type.is_schedulable() {
        log::info!(
            "event {} ({:?}) carries no schedule; nothing to do",
            event_id,
            event.event_type
        );
        return Ok(ScheduleOutcome::NotSchedulable);
    }

    allocator::validate_schedule_window(&event)?;

    let plan = generator::generate(&event, &options.generator)?;
    let assignments = allocator::allocate(&plan, &event, options.mode)?;

    let checksum = schedule_checksum(&plan, &assignments)?;
    let unchanged = !event.schedule_checksum.is_empty() && event.schedule_checksum == checksum;

    let ids = repository.allocate_match_ids(plan.len()).await?;
    let matches = bind_plan(&plan, &assignments, &ids, &event);
    let unplaced = matches.iter().filter(|m| !m.is_placed()).count();
    let match_count = matches.len();

    repository
        .replace_event_schedule(event_id, matches, checksum.clone())
        .await?;

    if unchanged {
        log::info!(
            "event {} re-scheduled, content unchanged (checksum {})",
            event_id,
            &checksum[..12.min(checksum.len())]
        );
        return Ok(ScheduleOutcome::Unchanged { checksum });
    }

    log::info!(
        "event {} scheduled: {} matches, {} unplaced",
        event_id,
        match_count,
        unplaced
    );
    Ok(ScheduleOutcome::Written {
        checksum,
        match_count,
        unplaced,
    })
}

/// Materialize the abstract plan into persistable matches, rewriting the
/// arena-index links to the freshly allocated ids.
fn bind_plan(
    plan: &MatchPlan,
    assignments: &[Option<Assignment>],
    ids: &[crate::api::MatchId],
    event: &Event,
) -> Vec<Match> {
    let id_of: HashMap<usize, crate::api::MatchId> =
        ids.iter().enumerate().map(|(i, &id)| (i, id)).collect();
    let link = |link: Option<usize>| link.and_then(|i| id_of.get(&i).copied());

    plan.matches
        .iter()
        .enumerate()
        .map(|(index, planned)| {
            let assignment = assignments.get(index).and_then(|a| a.as_ref());
            to_match(planned, index, assignment, &link, event)
        })
        .collect()
}

fn to_match(
    planned: &PlannedMatch,
    index: usize,
    assignment: Option<&Assignment>,
    link: &impl Fn(Option<usize>) -> Option<crate::api::MatchId>,
    event: &Event,
) -> Match {
    Match {
        id: link(Some(index)),
        event_id: event.id.unwrap_or(EventId::new(0)),
        division_id: planned.division_id,
        phase: planned.phase,
        sequence: planned.sequence,
        slot1: planned.slot1,
        slot2: planned.slot2,
        field_id: assignment.map(|a| a.field_id),
        start: assignment.map(|a| a.start),
        end: assignment.map(|a| a.end),
        referee_id: None,
        team_referee_id: None,
        previous_left_match: link(planned.previous_left),
        previous_right_match: link(planned.previous_right),
        winner_next_match: link(planned.winner_next),
        loser_next_match: link(planned.loser_next),
        status: MatchStatus::Scheduled,
        scoreline: None,
    }
}
