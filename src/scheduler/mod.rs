//! Event scheduling engine.
//!
//! Four components, composed left to right:
//!
//! - `generator`: event snapshot to abstract match plan (pure)
//! - `allocator`: availability templates to field/time assignments (pure)
//! - `orchestrator`: the locked load-generate-allocate-persist pipeline
//! - `progression`: result reporting, cascades and standings
//!
//! `error` carries the caller-facing failure types shared by all four.

pub mod allocator;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod progression;

pub use allocator::{allocate, expand_occurrences, AllocationMode, Assignment, Occurrence};
pub use error::{ScheduleError, ValidationError};
pub use generator::{generate, GeneratorOptions, MatchPlan, PlannedMatch};
pub use orchestrator::{schedule_event, OrchestratorError, ScheduleOptions, ScheduleOutcome};
pub use progression::{
    cascade_finalized, finalize, report_result, standings, CascadeReport, MatchOutcome,
    StandingsRow,
};
