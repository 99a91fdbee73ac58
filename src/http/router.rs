//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Legacy surface kept for older clients: camelCase match payloads,
    // schedule without options.
    let api_v1 = Router::new()
        .route("/events/{event_id}/matches", get(handlers::list_event_matches_v1))
        .route("/events/{event_id}/schedule", post(handlers::schedule_event_v1));

    let api_v2 = Router::new()
        // Event CRUD
        .route("/events", get(handlers::list_events))
        .route("/events", post(handlers::create_event))
        .route("/events/{event_id}", get(handlers::get_event))
        .route("/events/{event_id}", put(handlers::update_event))
        .route("/events/{event_id}", axum::routing::delete(handlers::delete_event))
        // Scheduling
        .route("/events/{event_id}/schedule", post(handlers::schedule_event))
        .route("/events/{event_id}/matches", get(handlers::list_event_matches))
        // Results and standings
        .route("/matches/{match_id}", get(handlers::get_match))
        .route("/matches/{match_id}/result", post(handlers::report_result))
        .route("/matches/{match_id}/finalize", post(handlers::finalize_match))
        .route(
            "/events/{event_id}/divisions/{division_id}/standings",
            get(handlers::division_standings),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .nest("/v2", api_v2)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::ScoringConfig;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::EventRepository>;
        let state = AppState::new(repo, ScoringConfig::default());
        let _router = create_router(state);
    }
}
