//! Repository implementations module.
//!
//! Currently a single in-memory implementation of `EventRepository`. A
//! SQL-backed variant plugs in behind the same trait.

pub mod local;

pub use local::LocalRepository;
