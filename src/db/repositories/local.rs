//! In-memory repository implementation.
//!
//! Backs unit tests and local development. All data lives in process
//! memory behind a `parking_lot` RwLock; every mutation takes the write
//! lock for its full duration, which gives the same atomicity the SQL
//! backends get from transactions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::api::{EventId, MatchId};
use crate::db::repository::{
    ErrorContext, EventLock, EventRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Event, Match};

#[derive(Default)]
struct Store {
    events: BTreeMap<i64, Event>,
    matches: BTreeMap<i64, Match>,
}

/// In-memory implementation of [`EventRepository`].
pub struct LocalRepository {
    store: RwLock<Store>,
    next_event_id: AtomicI64,
    next_match_id: AtomicI64,
    event_locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            next_event_id: AtomicI64::new(1),
            next_match_id: AtomicI64::new(1),
            event_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_handle(&self, event_id: EventId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.event_locks.lock();
        locks
            .entry(event_id.value())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn load_event_with_relations(&self, event_id: EventId) -> RepositoryResult<Event> {
        let store = self.store.read();
        store.events.get(&event_id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("event {} does not exist", event_id),
                ErrorContext::new("load_event_with_relations")
                    .with_entity("event")
                    .with_entity_id(event_id),
            )
        })
    }

    async fn save_event(&self, mut event: Event) -> RepositoryResult<Event> {
        let mut store = self.store.write();
        let id = match event.id {
            Some(id) => {
                if !store.events.contains_key(&id.value()) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("event {} does not exist", id),
                        ErrorContext::new("save_event")
                            .with_entity("event")
                            .with_entity_id(id),
                    ));
                }
                id
            }
            None => {
                let id = EventId::new(self.next_event_id.fetch_add(1, Ordering::SeqCst));
                event.id = Some(id);
                id
            }
        };
        store.events.insert(id.value(), event.clone());
        Ok(event)
    }

    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        let store = self.store.read();
        Ok(store.events.values().cloned().collect())
    }

    async fn delete_event(&self, event_id: EventId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store.events.remove(&event_id.value()).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("event {} does not exist", event_id),
                ErrorContext::new("delete_event")
                    .with_entity("event")
                    .with_entity_id(event_id),
            ));
        }
        store.matches.retain(|_, m| m.event_id != event_id);
        Ok(())
    }

    async fn load_match(&self, match_id: MatchId) -> RepositoryResult<Match> {
        let store = self.store.read();
        store.matches.get(&match_id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("match {} does not exist", match_id),
                ErrorContext::new("load_match")
                    .with_entity("match")
                    .with_entity_id(match_id),
            )
        })
    }

    async fn load_matches_by_event(&self, event_id: EventId) -> RepositoryResult<Vec<Match>> {
        let store = self.store.read();
        let mut matches: Vec<Match> = store
            .matches
            .values()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| {
            let phase_rank = if m.phase.is_bracket() { 1u8 } else { 0u8 };
            (phase_rank, m.phase.round(), m.sequence)
        });
        Ok(matches)
    }

    async fn allocate_match_ids(&self, count: usize) -> RepositoryResult<Vec<MatchId>> {
        let first = self.next_match_id.fetch_add(count as i64, Ordering::SeqCst);
        Ok((first..first + count as i64).map(MatchId::new).collect())
    }

    async fn replace_event_schedule(
        &self,
        event_id: EventId,
        matches: Vec<Match>,
        schedule_checksum: String,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let event = store.events.get_mut(&event_id.value()).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("event {} does not exist", event_id),
                ErrorContext::new("replace_event_schedule")
                    .with_entity("event")
                    .with_entity_id(event_id),
            )
        })?;
        event.schedule_checksum = schedule_checksum;

        store.matches.retain(|_, m| m.event_id != event_id);
        for m in matches {
            let id = m.id.ok_or_else(|| {
                RepositoryError::validation_with_context(
                    "schedule match has no id; allocate ids before writing".to_string(),
                    ErrorContext::new("replace_event_schedule").with_entity("match"),
                )
            })?;
            store.matches.insert(id.value(), m);
        }
        Ok(())
    }

    async fn update_match(&self, m: Match) -> RepositoryResult<Match> {
        let id = m.id.ok_or_else(|| {
            RepositoryError::validation_with_context(
                "cannot update a match without an id".to_string(),
                ErrorContext::new("update_match").with_entity("match"),
            )
        })?;
        let mut store = self.store.write();
        if !store.matches.contains_key(&id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("match {} does not exist", id),
                ErrorContext::new("update_match")
                    .with_entity("match")
                    .with_entity_id(id),
            ));
        }
        store.matches.insert(id.value(), m.clone());
        Ok(m)
    }

    async fn acquire_event_lock(&self, event_id: EventId) -> RepositoryResult<EventLock> {
        // Handle is resolved before the await so the registry mutex is
        // never held across a suspension point.
        let handle = self.lock_handle(event_id);
        let guard = handle.lock_owned().await;
        Ok(EventLock::new(guard))
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn bare_event(name: &str) -> Event {
        Event {
            id: None,
            name: name.to_string(),
            event_type: EventType::League,
            start: "2026-06-01T00:00:00Z".parse().unwrap(),
            end: "2026-06-30T00:00:00Z".parse().unwrap(),
            single_division: false,
            divisions: vec![],
            fields: vec![],
            time_slots: vec![],
            teams: vec![],
            schedule_checksum: String::new(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let a = repo.save_event(bare_event("a")).await.unwrap();
        let b = repo.save_event(bare_event("b")).await.unwrap();
        assert_eq!(a.id, Some(EventId::new(1)));
        assert_eq!(b.id, Some(EventId::new(2)));
    }

    #[tokio::test]
    async fn test_load_missing_event_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .load_event_with_relations(EventId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_allocate_match_ids_are_disjoint() {
        let repo = LocalRepository::new();
        let first = repo.allocate_match_ids(3).await.unwrap();
        let second = repo.allocate_match_ids(2).await.unwrap();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[tokio::test]
    async fn test_event_lock_is_exclusive() {
        let repo = Arc::new(LocalRepository::new());
        let event = repo.save_event(bare_event("locked")).await.unwrap();
        let event_id = event.id.unwrap();

        let lock = repo.acquire_event_lock(event_id).await.unwrap();

        let contender = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.acquire_event_lock(event_id).await })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(lock);
        contender.await.unwrap().unwrap();
    }
}
