//! Checksum calculation for schedule idempotency.
//!
//! A schedule write stores the checksum of its generated plan and
//! assignments on the event; re-scheduling an unchanged event snapshot
//! reproduces the checksum, which callers use to detect no-op runs.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::db::repository::RepositoryError;
use crate::scheduler::allocator::Assignment;
use crate::scheduler::generator::MatchPlan;

/// Calculate SHA-256 checksum of string content.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[derive(Serialize)]
struct ChecksumInput<'a> {
    plan: &'a MatchPlan,
    assignments: &'a [Option<Assignment>],
}

/// Checksum of a generated schedule, computed over the abstract plan and
/// its assignments before match ids are bound. Id allocation is the only
/// non-deterministic step of a schedule run, so excluding it keeps the
/// checksum stable across runs over an unchanged event.
pub fn schedule_checksum(
    plan: &MatchPlan,
    assignments: &[Option<Assignment>],
) -> Result<String, RepositoryError> {
    let input = ChecksumInput { plan, assignments };
    let json = serde_json::to_string(&input).map_err(|e| {
        RepositoryError::internal(format!("failed to serialize schedule for checksum: {}", e))
    })?;
    Ok(calculate_checksum(&json))
}
