//! Data Transfer Objects for the HTTP API.
//!
//! Domain models already derive Serialize/Deserialize and are served
//! directly on the v2 surface; this module adds the request/response
//! envelopes plus the legacy v1 projection, which keeps the camelCase
//! field names the first API generation shipped with.

use serde::{Deserialize, Serialize};

// Domain types served directly by v2 endpoints.
pub use crate::models::{Event, Match, Scoreline};
pub use crate::scheduler::progression::StandingsRow;

use crate::scheduler::allocator::AllocationMode;
use crate::scheduler::generator::GeneratorOptions;
use crate::scheduler::orchestrator::{ScheduleOptions, ScheduleOutcome};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

/// Response for event listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub total: usize,
}

/// Allocation mode on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationModeDto {
    Preview,
    Commit,
}

impl From<AllocationModeDto> for AllocationMode {
    fn from(dto: AllocationModeDto) -> Self {
        match dto {
            AllocationModeDto::Preview => AllocationMode::Preview,
            AllocationModeDto::Commit => AllocationMode::Commit,
        }
    }
}

/// Request body for running the schedule pipeline on an event. The mode
/// is required; clients always say whether this run is a preview or a
/// commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub mode: AllocationModeDto,
    /// Declared participant count for divisions without a final roster.
    #[serde(default)]
    pub participant_count: Option<u32>,
    /// Generate a third-place match for elimination play.
    #[serde(default)]
    pub include_consolation: bool,
}

impl ScheduleRequest {
    pub fn into_options(self) -> ScheduleOptions {
        ScheduleOptions {
            mode: self.mode.into(),
            generator: GeneratorOptions {
                participant_count: self.participant_count,
                include_consolation: self.include_consolation,
            },
        }
    }
}

/// Response for a schedule run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// One of "written", "unchanged", "not-schedulable".
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unplaced: Option<usize>,
}

impl From<ScheduleOutcome> for ScheduleResponse {
    fn from(outcome: ScheduleOutcome) -> Self {
        match outcome {
            ScheduleOutcome::NotSchedulable => Self {
                outcome: "not-schedulable".to_string(),
                checksum: None,
                match_count: None,
                unplaced: None,
            },
            ScheduleOutcome::Unchanged { checksum } => Self {
                outcome: "unchanged".to_string(),
                checksum: Some(checksum),
                match_count: None,
                unplaced: None,
            },
            ScheduleOutcome::Written {
                checksum,
                match_count,
                unplaced,
            } => Self {
                outcome: "written".to_string(),
                checksum: Some(checksum),
                match_count: Some(match_count),
                unplaced: Some(unplaced),
            },
        }
    }
}

/// Request body for reporting a match result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResultRequest {
    pub scoreline: Scoreline,
    /// Report and finalize in one call.
    #[serde(default)]
    pub finalize: bool,
    #[serde(rename = "override", default)]
    pub override_final: bool,
}

/// Request body for finalizing a match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalizeRequest {
    #[serde(rename = "override", default)]
    pub override_final: bool,
}

/// Response for a division standings query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub division_id: i64,
    pub rows: Vec<StandingsRow>,
}

// =============================================================================
// Legacy v1 projection
// =============================================================================

/// Match as the first API generation serialized it: flat camelCase fields,
/// nullable team ids instead of tagged slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDtoV1 {
    pub id: Option<i64>,
    pub event_id: i64,
    pub division_id: i64,
    /// "ROUND_ROBIN" or "BRACKET"
    pub phase: String,
    pub round: u32,
    pub team1_id: Option<i64>,
    pub team2_id: Option<i64>,
    pub field_id: Option<i64>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
}

impl From<&Match> for MatchDtoV1 {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.map(|id| id.value()),
            event_id: m.event_id.value(),
            division_id: m.division_id.value(),
            phase: if m.phase.is_bracket() {
                "BRACKET".to_string()
            } else {
                "ROUND_ROBIN".to_string()
            },
            round: m.phase.round(),
            team1_id: m.team1_id().map(|id| id.value()),
            team2_id: m.team2_id().map(|id| id.value()),
            field_id: m.field_id.map(|id| id.value()),
            start_time: m.start,
            end_time: m.end,
            status: match m.status {
                crate::models::MatchStatus::Scheduled => "SCHEDULED".to_string(),
                crate::models::MatchStatus::Reported => "REPORTED".to_string(),
                crate::models::MatchStatus::Final => "FINAL".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_uses_override_keyword() {
        let json = r#"{"scoreline": {"team1": 2, "team2": 1}, "override": true}"#;
        let request: ReportResultRequest = serde_json::from_str(json).unwrap();
        assert!(request.override_final);
        assert!(!request.finalize);
        assert_eq!(request.scoreline.team1, 2);
    }

    #[test]
    fn test_report_request_accepts_finalize_flag() {
        let json = r#"{"scoreline": {"team1": 2, "team2": 1}, "finalize": true}"#;
        let request: ReportResultRequest = serde_json::from_str(json).unwrap();
        assert!(request.finalize);
        assert!(!request.override_final);
    }

    #[test]
    fn test_schedule_request_requires_a_mode() {
        assert!(serde_json::from_str::<ScheduleRequest>("{}").is_err());

        let request: ScheduleRequest = serde_json::from_str(r#"{"mode": "preview"}"#).unwrap();
        let options = request.into_options();
        assert_eq!(options.mode, AllocationMode::Preview);
    }
}
