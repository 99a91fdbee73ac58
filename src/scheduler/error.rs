//! Typed failures for the scheduling engine.
//!
//! `ScheduleError` covers schedule generation/allocation; every variant is a
//! caller-fixable input problem, never a transient fault, so nothing here is
//! retried. `ValidationError` is the caller-local kind raised by result
//! reporting; it is always returned synchronously and never fatal.

use crate::api::{DivisionId, MatchId};
use crate::models::MatchStatus;

/// Schedule generation/allocation failure with a stable machine-readable
/// reason string alongside the human message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("division {division_id} has fewer than two participants")]
    InsufficientParticipants { division_id: DivisionId },

    #[error(
        "playoff cutoff {cutoff} is invalid for division {division_id} with {team_count} teams"
    )]
    InvalidPlayoffCutoff {
        division_id: DivisionId,
        cutoff: u32,
        team_count: u32,
    },

    #[error("invalid schedule window: {detail}")]
    InvalidScheduleWindow { detail: String },

    #[error(
        "availability exhausted for division {division_id}: {unplaced} match(es) left unplaced"
    )]
    CapacityExhausted {
        division_id: DivisionId,
        unplaced: usize,
    },
}

impl ScheduleError {
    /// Stable machine-readable reason code for API consumers.
    pub fn reason(&self) -> &'static str {
        match self {
            ScheduleError::InsufficientParticipants { .. } => "insufficient-participants",
            ScheduleError::InvalidPlayoffCutoff { .. } => "invalid-playoff-cutoff",
            ScheduleError::InvalidScheduleWindow { .. } => "invalid-schedule-window",
            ScheduleError::CapacityExhausted { .. } => "capacity-exhausted",
        }
    }

    pub fn invalid_window(detail: impl Into<String>) -> Self {
        ScheduleError::InvalidScheduleWindow {
            detail: detail.into(),
        }
    }
}

/// Result-reporting failure, returned synchronously to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed scoreline: {0}")]
    MalformedScoreline(String),

    #[error("illegal status transition from {from:?}")]
    IllegalTransition { from: MatchStatus },

    #[error("match {match_id} is already final; pass the override flag to correct it")]
    AlreadyFinal { match_id: MatchId },

    #[error("match {match_id} participants are not resolved yet")]
    UnresolvedParticipants { match_id: MatchId },

    #[error("a draw is not a permitted result for this match")]
    DrawNotPermitted,

    #[error("slot of match {match_id} is already occupied")]
    SlotOccupied { match_id: MatchId },

    #[error("match {match_id} would face a team against itself")]
    DuplicateTeam { match_id: MatchId },

    #[error("match {match_id} not found in event match set")]
    UnknownMatch { match_id: MatchId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(
            ScheduleError::InsufficientParticipants {
                division_id: DivisionId::new(1)
            }
            .reason(),
            "insufficient-participants"
        );
        assert_eq!(
            ScheduleError::InvalidPlayoffCutoff {
                division_id: DivisionId::new(1),
                cutoff: 9,
                team_count: 4
            }
            .reason(),
            "invalid-playoff-cutoff"
        );
        assert_eq!(
            ScheduleError::invalid_window("event start equals end").reason(),
            "invalid-schedule-window"
        );
        assert_eq!(
            ScheduleError::CapacityExhausted {
                division_id: DivisionId::new(1),
                unplaced: 3
            }
            .reason(),
            "capacity-exhausted"
        );
    }

    #[test]
    fn test_display_carries_context() {
        let err = ScheduleError::CapacityExhausted {
            division_id: DivisionId::new(7),
            unplaced: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('2'));
    }
}
