//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository. They take
//! the per-event lock, run the scheduling-engine functions over loaded
//! state and persist the outcome; handlers stay thin.

pub mod results;
pub mod standings;

pub use results::{finalize_match, report_match_result, ResultError};
pub use standings::division_standings;
