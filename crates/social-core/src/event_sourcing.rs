//! Loading and saving aggregates through an [`EventRepository`].
//!
//! Load replays the full stream into an empty aggregate and records the last
//! sequence number as its version. Save appends the uncommitted events at
//! that version and clears the buffer only once the store has accepted them.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::repository::{EventRepository, StoredEvent};

/// Rebuilds an aggregate from its stored history.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the stream is empty,
/// `DomainError::Infrastructure` if the history cannot be decoded or belongs
/// to another aggregate, and any error the repository reports.
pub async fn load<A: AggregateRoot>(
    repo: &dyn EventRepository,
    aggregate_id: Uuid,
) -> Result<A, DomainError> {
    let stored_events = repo.load_events(aggregate_id).await?;
    let aggregate = reconstitute::<A>(aggregate_id, &stored_events)?;
    debug!(
        aggregate_type = A::AGGREGATE_TYPE,
        %aggregate_id,
        version = aggregate.version(),
        "aggregate loaded"
    );
    Ok(aggregate)
}

/// Rebuilds an aggregate from events already fetched from the store.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if `stored_events` is empty and
/// `DomainError::Infrastructure` if an event cannot be decoded or belongs to
/// another aggregate.
pub fn reconstitute<A: AggregateRoot>(
    aggregate_id: Uuid,
    stored_events: &[StoredEvent],
) -> Result<A, DomainError> {
    let Some(last) = stored_events.last() else {
        return Err(DomainError::AggregateNotFound(aggregate_id));
    };

    let mut events = Vec::with_capacity(stored_events.len());
    for stored in stored_events {
        if stored.aggregate_id != aggregate_id {
            return Err(DomainError::Infrastructure(format!(
                "event {} belongs to aggregate {}, not {aggregate_id}",
                stored.event_id, stored.aggregate_id
            )));
        }
        events.push(A::Event::from_stored(stored)?);
    }

    let mut aggregate = A::default();
    aggregate.replay_events(events);
    aggregate.set_version(last.sequence_number);
    Ok(aggregate)
}

/// Persists an aggregate's uncommitted events and marks them committed.
///
/// Returns the events that were written; empty if there was nothing to save.
/// If the repository rejects the append, the aggregate is left as it was.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the aggregate has no identity
/// yet, and any error the repository reports (including
/// `DomainError::ConcurrencyConflict`).
pub async fn save<A: AggregateRoot>(
    repo: &dyn EventRepository,
    aggregate: &mut A,
) -> Result<Vec<StoredEvent>, DomainError> {
    let pending = aggregate.uncommitted_events();
    let Some(last) = pending.last() else {
        return Ok(Vec::new());
    };
    let Some(aggregate_id) = aggregate.aggregate_id() else {
        return Err(DomainError::Infrastructure(format!(
            "{} has uncommitted events but no identity",
            A::AGGREGATE_TYPE
        )));
    };

    let last_sequence_number = last.metadata().sequence_number;
    let expected_version = aggregate.version();
    let stored_events: Vec<StoredEvent> = pending.iter().map(StoredEvent::from_event).collect();

    if let Err(err) = repo
        .append_events(aggregate_id, expected_version, &stored_events)
        .await
    {
        warn!(
            aggregate_type = A::AGGREGATE_TYPE,
            %aggregate_id,
            expected_version,
            error = %err,
            "append rejected"
        );
        return Err(err);
    }

    aggregate.mark_changes_as_committed();
    aggregate.set_version(last_sequence_number);
    debug!(
        aggregate_type = A::AGGREGATE_TYPE,
        %aggregate_id,
        event_count = stored_events.len(),
        version = last_sequence_number,
        "aggregate saved"
    );
    Ok(stored_events)
}
