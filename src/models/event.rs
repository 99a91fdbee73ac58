//! Event aggregate and its relations.
//!
//! These are plain data structures: the Generator, Allocator and Progression
//! Engine read them, the Orchestrator mutates the event's denormalized
//! scheduling fields. The snapshot handed to the engine carries the event's
//! divisions, fields, availability templates and teams already loaded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{DivisionId, EventId, FieldId, TeamId, TimeSlotId};
use crate::models::time::DayOfWeek;

/// Event category. Only leagues and tournaments produce a schedule; the
/// remaining types are pass-through for the Orchestrator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    League,
    Tournament,
    Pickup,
    Clinic,
    #[serde(other)]
    Other,
}

impl EventType {
    /// Whether the scheduling engine generates matches for this event type.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, EventType::League | EventType::Tournament)
    }
}

/// A named competitive bracket within an event (by skill, gender, age, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Bracket size cutoff for the hybrid league-then-playoff format.
    /// Zero disables playoffs for this division.
    #[serde(default)]
    pub playoff_team_count: u32,
    #[serde(default)]
    pub max_participants: Option<u32>,
}

/// Participant team. `seed` drives bracket placement; unseeded teams sort
/// after seeded ones in stable input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default)]
    pub name: String,
    pub division_id: DivisionId,
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Venue usable by the event. An empty `division_ids` list means the field
/// can host any division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub field_number: u32,
    #[serde(default)]
    pub division_ids: Vec<DivisionId>,
}

/// Availability template: a recurring (or one-off) declaration of when and
/// where matches can be hosted.
///
/// Multiple `days_of_week` entries and multiple `field_ids` denote a
/// cross-product of discrete occurrences; each (day, field) pair is an
/// independent bookable unit. The time window is half-open minute-of-day,
/// `end_time_minutes > start_time_minutes`. A non-repeating template
/// collapses to its `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub days_of_week: Vec<DayOfWeek>,
    pub start_time_minutes: u16,
    pub end_time_minutes: u16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_repeating")]
    pub repeating: bool,
    pub field_ids: Vec<FieldId>,
    /// Divisions this window may serve; empty means all divisions.
    #[serde(default)]
    pub division_ids: Vec<DivisionId>,
}

fn default_repeating() -> bool {
    true
}

/// Event snapshot with relations loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<EventId>,
    #[serde(default)]
    pub name: String,
    pub event_type: EventType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Forces every time slot to serve all of the event's divisions.
    #[serde(default)]
    pub single_division: bool,
    /// Ordered division list; allocation order follows this ordering.
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub teams: Vec<Team>,
    /// Checksum of the last generated match set, written by the Orchestrator.
    #[serde(default)]
    pub schedule_checksum: String,
}

impl Event {
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn division(&self, id: DivisionId) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    /// Teams of one division in stable input order.
    pub fn teams_in_division(&self, division_id: DivisionId) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.division_id == division_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_schedulable() {
        assert!(EventType::League.is_schedulable());
        assert!(EventType::Tournament.is_schedulable());
        assert!(!EventType::Pickup.is_schedulable());
        assert!(!EventType::Clinic.is_schedulable());
        assert!(!EventType::Other.is_schedulable());
    }

    #[test]
    fn test_event_type_serde_unknown_maps_to_other() {
        let parsed: EventType = serde_json::from_str("\"CAMP\"").unwrap();
        assert_eq!(parsed, EventType::Other);
    }

    #[test]
    fn test_event_type_serde_roundtrip() {
        let json = serde_json::to_string(&EventType::Tournament).unwrap();
        assert_eq!(json, "\"TOURNAMENT\"");
    }

    #[test]
    fn test_teams_in_division_preserves_input_order() {
        let event = Event {
            id: Some(EventId::new(1)),
            name: "Summer Cup".to_string(),
            event_type: EventType::Tournament,
            start: "2026-06-01T00:00:00Z".parse().unwrap(),
            end: "2026-06-30T00:00:00Z".parse().unwrap(),
            single_division: false,
            divisions: vec![],
            fields: vec![],
            time_slots: vec![],
            teams: vec![
                Team {
                    id: TeamId::new(10),
                    name: "A".to_string(),
                    division_id: DivisionId::new(1),
                    seed: None,
                },
                Team {
                    id: TeamId::new(11),
                    name: "B".to_string(),
                    division_id: DivisionId::new(2),
                    seed: None,
                },
                Team {
                    id: TeamId::new(12),
                    name: "C".to_string(),
                    division_id: DivisionId::new(1),
                    seed: None,
                },
            ],
            schedule_checksum: String::new(),
        };

        let ids: Vec<i64> = event
            .teams_in_division(DivisionId::new(1))
            .iter()
            .map(|t| t.id.value())
            .collect();
        assert_eq!(ids, vec![10, 12]);
    }
}
