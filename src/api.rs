//! Public API surface for the scheduling engine.
//!
//! This file consolidates the identifier newtypes and re-exports the domain
//! types the rest of the platform consumes. All types derive
//! Serialize/Deserialize for JSON serialization.

crate::define_id_type!(i64, EventId);
crate::define_id_type!(i64, DivisionId);
crate::define_id_type!(i64, TeamId);
crate::define_id_type!(i64, FieldId);
crate::define_id_type!(i64, TimeSlotId);
crate::define_id_type!(i64, MatchId);
crate::define_id_type!(i64, RefereeId);

pub use crate::models::event::{Division, Event, EventType, Field, Team, TimeSlot};
pub use crate::models::matches::{Match, MatchPhase, MatchStatus, ParticipantSlot};
pub use crate::models::scoring::{BonusRule, Scoreline, ScoringConfig, SetScore, Side};
pub use crate::models::time::DayOfWeek;

pub use crate::scheduler::error::{ScheduleError, ValidationError};

#[cfg(test)]
mod tests {
    use super::{DivisionId, EventId, MatchId, TeamId};

    #[test]
    fn test_event_id_new() {
        let id = EventId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_event_id_equality() {
        let id1 = EventId::new(100);
        let id2 = EventId::new(100);
        let id3 = EventId::new(101);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_match_id_ordering() {
        let id1 = MatchId::new(1);
        let id2 = MatchId::new(2);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(DivisionId::new(7).to_string(), "7");
        assert_eq!(TeamId::new(-3).to_string(), "-3");
    }

    #[test]
    fn test_id_conversions() {
        let id: TeamId = 55i64.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 55);
    }

    #[test]
    fn test_ids_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(TeamId::new(1));
        set.insert(TeamId::new(2));
        set.insert(TeamId::new(1)); // Duplicate

        assert_eq!(set.len(), 2);
    }
}
