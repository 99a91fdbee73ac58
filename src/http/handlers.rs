//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! scheduler and service layers for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    EventListResponse, FinalizeRequest, HealthResponse, MatchDtoV1, ReportResultRequest,
    ScheduleRequest, ScheduleResponse, StandingsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{DivisionId, EventId, MatchId};
use crate::models::{Event, Match};
use crate::scheduler::orchestrator;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.health_check().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v2".to_string(),
        repository,
    }))
}

// =============================================================================
// Event CRUD
// =============================================================================

/// GET /v2/events
pub async fn list_events(State(state): State<AppState>) -> HandlerResult<EventListResponse> {
    let events = state.repository.list_events().await?;
    let total = events.len();
    Ok(Json(EventListResponse { events, total }))
}

/// POST /v2/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(mut event): Json<Event>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    if event.id.is_some() {
        return Err(AppError::BadRequest(
            "a new event must not carry an id".to_string(),
        ));
    }
    event.schedule_checksum.clear();
    let stored = state.repository.save_event(event).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v2/events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> HandlerResult<Event> {
    let event = state
        .repository
        .load_event_with_relations(EventId::new(event_id))
        .await?;
    Ok(Json(event))
}

/// PUT /v2/events/{event_id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(mut event): Json<Event>,
) -> HandlerResult<Event> {
    let event_id = EventId::new(event_id);
    if event.id.is_some() && event.id != Some(event_id) {
        return Err(AppError::BadRequest(
            "event id in body disagrees with path".to_string(),
        ));
    }
    event.id = Some(event_id);
    // The checksum is engine-owned; carry the stored value forward.
    let stored = state.repository.load_event_with_relations(event_id).await?;
    event.schedule_checksum = stored.schedule_checksum;
    Ok(Json(state.repository.save_event(event).await?))
}

/// DELETE /v2/events/{event_id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_event(EventId::new(event_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Scheduling
// =============================================================================

/// POST /v2/events/{event_id}/schedule
pub async fn schedule_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<ScheduleRequest>,
) -> HandlerResult<ScheduleResponse> {
    let outcome = orchestrator::schedule_event(
        state.repository.as_ref(),
        EventId::new(event_id),
        &request.into_options(),
    )
    .await?;
    Ok(Json(outcome.into()))
}

/// GET /v2/events/{event_id}/matches
pub async fn list_event_matches(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> HandlerResult<Vec<Match>> {
    let event_id = EventId::new(event_id);
    // Distinguish a missing event from an event with no schedule yet.
    state.repository.load_event_with_relations(event_id).await?;
    let matches = state.repository.load_matches_by_event(event_id).await?;
    Ok(Json(matches))
}

/// GET /v2/matches/{match_id}
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> HandlerResult<Match> {
    let m = state.repository.load_match(MatchId::new(match_id)).await?;
    Ok(Json(m))
}

// =============================================================================
// Results and standings
// =============================================================================

/// POST /v2/matches/{match_id}/result
pub async fn report_result(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<ReportResultRequest>,
) -> HandlerResult<Match> {
    let m = services::report_match_result(
        state.repository.as_ref(),
        MatchId::new(match_id),
        request.scoreline,
        &state.scoring,
        request.finalize,
        request.override_final,
    )
    .await?;
    Ok(Json(m))
}

/// POST /v2/matches/{match_id}/finalize
pub async fn finalize_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<FinalizeRequest>,
) -> HandlerResult<Match> {
    let m = services::finalize_match(
        state.repository.as_ref(),
        MatchId::new(match_id),
        &state.scoring,
        request.override_final,
    )
    .await?;
    Ok(Json(m))
}

/// GET /v2/events/{event_id}/divisions/{division_id}/standings
pub async fn division_standings(
    State(state): State<AppState>,
    Path((event_id, division_id)): Path<(i64, i64)>,
) -> HandlerResult<StandingsResponse> {
    let rows = services::division_standings(
        state.repository.as_ref(),
        EventId::new(event_id),
        DivisionId::new(division_id),
        &state.scoring,
    )
    .await?;
    Ok(Json(StandingsResponse { division_id, rows }))
}

// =============================================================================
// Legacy v1 surface
// =============================================================================

/// GET /v1/events/{event_id}/matches
pub async fn list_event_matches_v1(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> HandlerResult<Vec<MatchDtoV1>> {
    let event_id = EventId::new(event_id);
    state.repository.load_event_with_relations(event_id).await?;
    let matches = state.repository.load_matches_by_event(event_id).await?;
    Ok(Json(matches.iter().map(MatchDtoV1::from).collect()))
}

/// POST /v1/events/{event_id}/schedule
///
/// The v1 surface had no schedule options; it always commits.
pub async fn schedule_event_v1(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> HandlerResult<ScheduleResponse> {
    let outcome = orchestrator::schedule_event(
        state.repository.as_ref(),
        EventId::new(event_id),
        &orchestrator::ScheduleOptions::commit(),
    )
    .await?;
    Ok(Json(outcome.into()))
}
