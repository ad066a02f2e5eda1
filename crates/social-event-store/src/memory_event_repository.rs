//! In-memory implementation of the `EventRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use social_core::error::DomainError;
use social_core::repository::{EventRepository, NO_EVENTS_VERSION, StoredEvent};

/// Event repository keeping every stream in process memory.
///
/// Appends are checked against the stream's current version under a single
/// write lock, so two writers racing on the same stream cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates an empty `InMemoryEventRepository`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events stored for `aggregate_id`.
    pub async fn stream_len(&self, aggregate_id: Uuid) -> usize {
        self.streams
            .read()
            .await
            .get(&aggregate_id)
            .map_or(0, Vec::len)
    }
}

fn current_version(stream: Option<&Vec<StoredEvent>>) -> i64 {
    stream
        .and_then(|events| events.last())
        .map_or(NO_EVENTS_VERSION, |event| event.sequence_number)
}

fn check_batch(
    aggregate_id: Uuid,
    expected_version: i64,
    events: &[StoredEvent],
) -> Result<(), DomainError> {
    for (next, event) in (expected_version + 1..).zip(events) {
        if event.aggregate_id != aggregate_id {
            return Err(DomainError::Infrastructure(format!(
                "event {} belongs to aggregate {}, not {aggregate_id}",
                event.event_id, event.aggregate_id
            )));
        }
        if event.sequence_number != next {
            return Err(DomainError::Infrastructure(format!(
                "event {} has sequence number {}, expected {next}",
                event.event_id, event.sequence_number
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().await;
        let events = streams.get(&aggregate_id).cloned().unwrap_or_default();
        debug!(%aggregate_id, count = events.len(), "loaded event stream");
        Ok(events)
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        let mut streams = self.streams.write().await;
        let actual = current_version(streams.get(&aggregate_id));
        if actual != expected_version {
            warn!(%aggregate_id, expected_version, actual, "rejected stale append");
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        check_batch(aggregate_id, expected_version, events)?;
        if events.is_empty() {
            return Ok(());
        }

        streams
            .entry(aggregate_id)
            .or_default()
            .extend_from_slice(events);
        debug!(%aggregate_id, appended = events.len(), "appended events");
        Ok(())
    }
}
