//! # Event Scheduling Engine
//!
//! Scheduling backend for a sports-event platform: given an event with
//! divisions, teams, fields and availability templates, it generates
//! round-robin and single-elimination match sets, books them onto concrete
//! field/time occurrences, and advances winners and standings as results
//! come in. A REST API via Axum exposes the engine to the platform.
//!
//! ## Features
//!
//! - **Generation**: circle-method round robins, seeded elimination
//!   brackets, hybrid league-then-playoff formats
//! - **Allocation**: availability templates expanded to discrete
//!   occurrences, deterministic conflict-free booking, preview and commit
//!   modes
//! - **Progression**: match state machine, winner/loser cascades,
//!   standings with configurable scoring rules
//! - **Idempotency**: every run replaces the schedule wholesale; checksums
//!   tell callers when a re-run reproduced identical content
//! - **HTTP API**: versioned RESTful endpoints for the platform frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Typed ids and the public type surface
//! - [`models`]: Event aggregate, matches, scoring configuration
//! - [`scheduler`]: Generator, Allocator, Orchestrator and Progression
//! - [`db`]: Repository pattern and persistence layer
//! - [`services`]: High-level business logic over the repository
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod scheduler;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
