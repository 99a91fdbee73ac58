//! Field/time allocation.
//!
//! Expands availability templates into discrete occurrences and binds the
//! Generator's abstract matches to them. Allocation order is deterministic:
//! occurrences sort chronologically then by field id, matches walk
//! round-by-round (all rotation rounds before any bracket round, divisions
//! in the event's declared order within a round), and a booking blocks the
//! whole assigned interval on its field, so occurrences from different
//! templates that overlap in time can never both be handed out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{DivisionId, FieldId};
use crate::models::time::{minute_of_day_instant, MINUTES_PER_DAY};
use crate::models::{Event, Match, TimeSlot};
use crate::scheduler::error::ScheduleError;
use crate::scheduler::generator::MatchPlan;

/// One concrete bookable (field, date, time-window) instance expanded from
/// an availability template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub field_id: FieldId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Divisions this occurrence may host; empty means any.
    pub division_ids: Vec<DivisionId>,
}

impl Occurrence {
    pub fn hosts(&self, division_id: DivisionId) -> bool {
        self.division_ids.is_empty() || self.division_ids.contains(&division_id)
    }
}

/// Whether exhausting availability is tolerated or fatal. An explicit,
/// required parameter: callers choose, the engine never defaults it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AllocationMode {
    /// Unplaced matches keep null field/times.
    Preview,
    /// Every match must be placed or the run fails.
    Commit,
}

/// Field/time binding for one planned match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub field_id: FieldId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Validate the event and template time windows before any generation runs,
/// so a malformed event never reaches partial persistence.
///
/// `start == end` is the platform's encoding of "no fixed end instant",
/// which dated scheduling (league/tournament) rejects.
pub fn validate_schedule_window(event: &Event) -> Result<(), ScheduleError> {
    if event.event_type.is_schedulable() && event.start >= event.end {
        return Err(ScheduleError::invalid_window(
            "event requires a fixed schedule window with end after start",
        ));
    }
    for slot in &event.time_slots {
        if slot.end_time_minutes <= slot.start_time_minutes {
            return Err(ScheduleError::invalid_window(format!(
                "time slot {} has end minute {} not after start minute {}",
                slot.id, slot.end_time_minutes, slot.start_time_minutes
            )));
        }
        if slot.start_time_minutes >= MINUTES_PER_DAY || slot.end_time_minutes > MINUTES_PER_DAY {
            return Err(ScheduleError::invalid_window(format!(
                "time slot {} exceeds minute-of-day bounds",
                slot.id
            )));
        }
    }
    Ok(())
}

/// Expand every availability template into concrete occurrences, sorted
/// chronologically then by field id.
pub fn expand_occurrences(event: &Event) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    for slot in &event.time_slots {
        expand_template(event, slot, &mut occurrences);
    }
    occurrences.sort_by_key(|occ| (occ.start, occ.field_id));
    occurrences
}

fn expand_template(event: &Event, slot: &TimeSlot, out: &mut Vec<Occurrence>) {
    let mut dates = Vec::new();
    if slot.repeating {
        let mut date = slot.start_date;
        while date <= slot.end_date {
            if slot.days_of_week.iter().any(|day| day.matches(date)) {
                dates.push(date);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
    } else {
        // One-off template: a single date regardless of weekday.
        dates.push(slot.start_date);
    }

    for date in dates {
        let start = minute_of_day_instant(date, slot.start_time_minutes);
        let end = minute_of_day_instant(date, slot.end_time_minutes);
        for &field_id in &slot.field_ids {
            let Some(division_ids) = occurrence_divisions(event, slot, field_id) else {
                continue;
            };
            out.push(Occurrence {
                field_id,
                start,
                end,
                division_ids,
            });
        }
    }
}

/// Eligible divisions of one (template, field) pairing. `None` means the
/// pairing is contradictory (disjoint template/field restrictions) and no
/// occurrence is produced; an empty vec means unrestricted.
fn occurrence_divisions(
    event: &Event,
    slot: &TimeSlot,
    field_id: FieldId,
) -> Option<Vec<DivisionId>> {
    if event.single_division {
        // Every time slot serves all of the event's divisions.
        return Some(Vec::new());
    }
    let field_divisions = event
        .field(field_id)
        .map(|f| f.division_ids.clone())
        .unwrap_or_default();
    match (slot.division_ids.is_empty(), field_divisions.is_empty()) {
        (true, true) => Some(Vec::new()),
        (false, true) => Some(slot.division_ids.clone()),
        (true, false) => Some(field_divisions),
        (false, false) => {
            let intersection: Vec<DivisionId> = slot
                .division_ids
                .iter()
                .copied()
                .filter(|d| field_divisions.contains(d))
                .collect();
            if intersection.is_empty() {
                None
            } else {
                Some(intersection)
            }
        }
    }
}

/// Bind planned matches to occurrences.
///
/// Returns one `Option<Assignment>` per plan entry, index-aligned. In
/// commit mode an unplaced match is a `capacity-exhausted` error; in
/// preview mode it stays `None`.
pub fn allocate(
    plan: &MatchPlan,
    event: &Event,
    mode: AllocationMode,
) -> Result<Vec<Option<Assignment>>, ScheduleError> {
    let occurrences = expand_occurrences(event);
    let mut booked: Vec<Assignment> = Vec::new();
    let mut assignments: Vec<Option<Assignment>> = vec![None; plan.matches.len()];

    for index in allocation_order(plan, event) {
        let division_id = plan.matches[index].division_id;
        let found = occurrences.iter().find(|occ| {
            occ.hosts(division_id) && !field_conflict(&booked, occ.field_id, occ.start, occ.end)
        });
        match found {
            Some(occ) => {
                let assignment = Assignment {
                    field_id: occ.field_id,
                    start: occ.start,
                    end: occ.end,
                };
                booked.push(assignment.clone());
                assignments[index] = Some(assignment);
            }
            None if mode == AllocationMode::Commit => {
                let unplaced = allocation_order(plan, event)
                    .into_iter()
                    .filter(|i| assignments[*i].is_none())
                    .count();
                return Err(ScheduleError::CapacityExhausted {
                    division_id,
                    unplaced,
                });
            }
            None => {
                log::debug!(
                    "leaving match {} of division {} unplaced (preview mode)",
                    index,
                    division_id
                );
            }
        }
    }

    Ok(assignments)
}

/// Whether a booking on `field_id` already covers any part of
/// `[start, end)`. Identical intervals overlap too, so a consumed
/// occurrence is rejected along with everything it clashes with.
fn field_conflict(
    booked: &[Assignment],
    field_id: FieldId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    booked
        .iter()
        .any(|a| a.field_id == field_id && a.start < end && start < a.end)
}

/// Deterministic walk order over plan indices: rotation play first, then
/// bracket depth, rounds ascending, divisions in event order, then the
/// generator's sequence.
fn allocation_order(plan: &MatchPlan, event: &Event) -> Vec<usize> {
    let division_position = |division_id: DivisionId| -> usize {
        event
            .divisions
            .iter()
            .position(|d| d.id == division_id)
            .unwrap_or(usize::MAX)
    };

    let mut indices: Vec<usize> = (0..plan.matches.len()).collect();
    indices.sort_by_key(|&i| {
        let m = &plan.matches[i];
        let phase_rank = if m.phase.is_bracket() { 1u8 } else { 0u8 };
        (
            phase_rank,
            m.phase.round(),
            division_position(m.division_id),
            m.sequence,
        )
    });
    indices
}

/// Bind one already-persisted match that was left in preview mode, using
/// the occurrences not consumed by the event's other matches. Used by the
/// Progression Engine when a cascade resolves a match's participants.
pub fn allocate_unplaced(event: &Event, matches: &[Match], target: usize) -> Option<Assignment> {
    let occurrences = expand_occurrences(event);
    let division_id = matches[target].division_id;

    let occ = occurrences.iter().find(|occ| {
        occ.hosts(division_id)
            && !matches.iter().any(|m| {
                m.field_id == Some(occ.field_id)
                    && m.start
                        .zip(m.end)
                        .is_some_and(|(s, e)| s < occ.end && occ.start < e)
            })
    })?;

    Some(Assignment {
        field_id: occ.field_id,
        start: occ.start,
        end: occ.end,
    })
}
