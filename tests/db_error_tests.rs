//! Tests for db::repository::error module.

use ses_rust::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("test_operation");
    assert_eq!(ctx.operation, Some("test_operation".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("replace_event_schedule")
        .with_entity("event")
        .with_entity_id(42)
        .with_details("stale snapshot")
        .retryable();

    assert_eq!(ctx.operation, Some("replace_event_schedule".to_string()));
    assert_eq!(ctx.entity, Some("event".to_string()));
    assert_eq!(ctx.entity_id, Some("42".to_string()));
    assert_eq!(ctx.details, Some("stale snapshot".to_string()));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("load_match")
        .with_entity("match")
        .with_entity_id("123");

    let display = format!("{}", ctx);
    assert!(display.contains("operation=load_match"));
    assert!(display.contains("entity=match"));
    assert!(display.contains("id=123"));
    assert!(!display.contains("retryable"));
}

#[test]
fn test_not_found_is_not_retryable() {
    let err = RepositoryError::not_found("event 7 does not exist");
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("event 7 does not exist"));
}

#[test]
fn test_conflict_is_retryable() {
    let err = RepositoryError::conflict("concurrent schedule write");
    assert!(err.is_retryable());
}

#[test]
fn test_with_operation_updates_context() {
    let err = RepositoryError::validation("match has no id").with_operation("update_match");
    assert_eq!(err.context().operation, Some("update_match".to_string()));
}

#[test]
fn test_error_variants_display_their_category() {
    assert!(RepositoryError::not_found("x").to_string().starts_with("Not found"));
    assert!(RepositoryError::validation("x")
        .to_string()
        .starts_with("Data validation error"));
    assert!(RepositoryError::configuration("x")
        .to_string()
        .starts_with("Configuration error"));
    assert!(RepositoryError::internal("x").to_string().starts_with("Internal error"));
    assert!(RepositoryError::conflict("x").to_string().starts_with("Conflict"));
}
