//! Match records and the bracket progression graph.
//!
//! Bracket links are identifier references stored alongside each match, not
//! in-memory pointers; the Generator works with arena indices and the
//! Orchestrator rebinds them to `MatchId`s at persistence time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{DivisionId, EventId, FieldId, MatchId, RefereeId, TeamId};
use crate::models::scoring::Scoreline;

/// Match lifecycle. Transitions only move forward; correcting a FINAL score
/// is a fresh REPORTED -> FINAL cycle under an explicit override flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Reported,
    Final,
}

/// Which phase of the event a match belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchPhase {
    /// Rotation play; `round` is 1-based.
    RoundRobin { round: u32 },
    /// Elimination play; `round` is 1-based bracket depth from the first
    /// round towards the final.
    Bracket { round: u32 },
}

impl MatchPhase {
    pub fn round(&self) -> u32 {
        match self {
            MatchPhase::RoundRobin { round } | MatchPhase::Bracket { round } => *round,
        }
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self, MatchPhase::Bracket { .. })
    }
}

/// One side of a match.
///
/// A tagged variant rather than a nullable team id: playoff matches in the
/// hybrid league format are keyed by projected standings rank until league
/// play finishes, and link-fed bracket slots stay open until their feeder
/// match goes FINAL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantSlot {
    Team { id: TeamId },
    Rank { rank: u32 },
    Open,
}

impl ParticipantSlot {
    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            ParticipantSlot::Team { id } => Some(*id),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ParticipantSlot::Open)
    }
}

/// A concrete or abstract match. Field and time stay `None` in preview mode
/// until allocation (or a later cascade) binds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Option<MatchId>,
    pub event_id: EventId,
    pub division_id: DivisionId,
    pub phase: MatchPhase,
    /// Deterministic ordering key within (phase, round).
    pub sequence: u32,
    pub slot1: ParticipantSlot,
    pub slot2: ParticipantSlot,
    pub field_id: Option<FieldId>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub referee_id: Option<RefereeId>,
    #[serde(default)]
    pub team_referee_id: Option<TeamId>,
    /// Feeder whose winner occupies `slot1`.
    #[serde(default)]
    pub previous_left_match: Option<MatchId>,
    /// Feeder whose winner occupies `slot2`.
    #[serde(default)]
    pub previous_right_match: Option<MatchId>,
    /// Where this match's winner advances to.
    #[serde(default)]
    pub winner_next_match: Option<MatchId>,
    /// Where this match's loser advances to (consolation bracket only).
    #[serde(default)]
    pub loser_next_match: Option<MatchId>,
    pub status: MatchStatus,
    #[serde(default)]
    pub scoreline: Option<Scoreline>,
}

impl Match {
    pub fn team1_id(&self) -> Option<TeamId> {
        self.slot1.team_id()
    }

    pub fn team2_id(&self) -> Option<TeamId> {
        self.slot2.team_id()
    }

    /// Both sides resolved to concrete teams.
    pub fn is_resolved(&self) -> bool {
        self.team1_id().is_some() && self.team2_id().is_some()
    }

    /// Field and time bound.
    pub fn is_placed(&self) -> bool {
        self.field_id.is_some() && self.start.is_some() && self.end.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> Match {
        Match {
            id: Some(MatchId::new(1)),
            event_id: EventId::new(1),
            division_id: DivisionId::new(1),
            phase: MatchPhase::Bracket { round: 1 },
            sequence: 0,
            slot1: ParticipantSlot::Team { id: TeamId::new(4) },
            slot2: ParticipantSlot::Open,
            field_id: None,
            start: None,
            end: None,
            referee_id: None,
            team_referee_id: None,
            previous_left_match: None,
            previous_right_match: None,
            winner_next_match: None,
            loser_next_match: None,
            status: MatchStatus::Scheduled,
            scoreline: None,
        }
    }

    #[test]
    fn test_participant_slot_accessors() {
        let m = sample_match();
        assert_eq!(m.team1_id(), Some(TeamId::new(4)));
        assert_eq!(m.team2_id(), None);
        assert!(!m.is_resolved());
        assert!(m.slot2.is_open());
    }

    #[test]
    fn test_phase_round() {
        assert_eq!(MatchPhase::RoundRobin { round: 3 }.round(), 3);
        assert!(MatchPhase::Bracket { round: 1 }.is_bracket());
        assert!(!MatchPhase::RoundRobin { round: 1 }.is_bracket());
    }

    #[test]
    fn test_slot_serde_tagged() {
        let slot = ParticipantSlot::Rank { rank: 2 };
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "{\"kind\":\"rank\",\"rank\":2}");
        let back: ParticipantSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_match_status_serde() {
        let json = serde_json::to_string(&MatchStatus::Scheduled).unwrap();
        assert_eq!(json, "\"SCHEDULED\"");
    }
}
