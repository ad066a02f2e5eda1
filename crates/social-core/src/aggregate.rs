//! Aggregate root abstraction.
//!
//! State is never stored directly. An aggregate is the result of applying its
//! events in order, and every change is expressed by raising a new event.
//! [`EventSourced`] owns the parts every aggregate shares (identity, version,
//! the buffer of events not yet persisted) and delegates the state
//! transition itself to an [`Aggregate`] implementation.
//!
//! Raising and replaying go through the same `apply`, so state rebuilt from
//! the log is identical to the state produced when the events were first
//! raised.

use uuid::Uuid;

use crate::event::DomainEvent;
use crate::repository::NO_EVENTS_VERSION;

/// Per-entity state transition.
///
/// `Default` is the state of an aggregate before its first event. `apply`
/// must be a pure function of the current state and the event, and should be
/// an exhaustive `match` over the event kinds so that an unhandled event is
/// a compile error rather than a silently skipped fact.
pub trait Aggregate: Default + Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Type name used in logs and errors.
    const AGGREGATE_TYPE: &'static str;

    /// Applies one event to the state.
    fn apply(&mut self, event: &Self::Event);
}

/// Trait for aggregate roots that reconstitute from event history.
///
/// This is the seam repositories and command handlers work against.
pub trait AggregateRoot: Default + Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Type name used in logs and errors.
    const AGGREGATE_TYPE: &'static str;

    /// Returns the aggregate identifier, or `None` before the first event.
    fn aggregate_id(&self) -> Option<Uuid>;

    /// Returns the last persisted sequence number, or
    /// [`NO_EVENTS_VERSION`] if nothing is persisted.
    fn version(&self) -> i64;

    /// Records how much of the stream is persisted. Only the persistence
    /// layer calls this.
    fn set_version(&mut self, version: i64);

    /// Applies historical events in order without buffering them.
    fn replay_events(&mut self, events: Vec<Self::Event>);

    /// Returns events raised since the last commit, oldest first.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn mark_changes_as_committed(&mut self);
}

/// Identity, version and uncommitted-event buffer of an event-sourced
/// entity, composed with the entity's own state.
#[derive(Debug)]
pub struct EventSourced<A: Aggregate> {
    id: Option<Uuid>,
    version: i64,
    state: A,
    uncommitted_events: Vec<A::Event>,
}

impl<A> Clone for EventSourced<A>
where
    A: Aggregate + Clone,
    A::Event: Clone,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            version: self.version,
            state: self.state.clone(),
            uncommitted_events: self.uncommitted_events.clone(),
        }
    }
}

impl<A: Aggregate> Default for EventSourced<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> EventSourced<A> {
    /// Creates an empty root, ready to raise its first event or to replay
    /// history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            version: NO_EVENTS_VERSION,
            state: A::default(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the aggregate identifier, set by the first applied event.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Returns the last persisted sequence number.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Sets the last persisted sequence number.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// Returns the materialized state.
    #[must_use]
    pub fn state(&self) -> &A {
        &self.state
    }

    /// Returns the sequence number the next raised event will carry.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Applies a newly raised event and buffers it for persistence.
    ///
    /// Call only after the business operation has validated its invariants.
    pub fn raise(&mut self, event: A::Event) {
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    /// Applies persisted events in order. Nothing is buffered.
    pub fn replay<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = A::Event>,
    {
        for event in events {
            self.apply(&event);
        }
    }

    /// Returns events raised since the last commit, oldest first.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[A::Event] {
        &self.uncommitted_events
    }

    /// Clears the uncommitted buffer. Version and state are untouched.
    pub fn mark_changes_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn apply(&mut self, event: &A::Event) {
        let event_aggregate_id = event.aggregate_id();
        match self.id {
            None => self.id = Some(event_aggregate_id),
            // An event from another stream would corrupt state; refuse it.
            Some(id) => assert_eq!(
                id,
                event_aggregate_id,
                "{} {id} cannot apply {} belonging to aggregate {event_aggregate_id}",
                A::AGGREGATE_TYPE,
                event.event_type(),
            ),
        }
        self.state.apply(event);
    }
}

impl<A: Aggregate> AggregateRoot for EventSourced<A> {
    type Event = A::Event;

    const AGGREGATE_TYPE: &'static str = A::AGGREGATE_TYPE;

    fn aggregate_id(&self) -> Option<Uuid> {
        self.id()
    }

    fn version(&self) -> i64 {
        EventSourced::version(self)
    }

    fn set_version(&mut self, version: i64) {
        EventSourced::set_version(self, version);
    }

    fn replay_events(&mut self, events: Vec<Self::Event>) {
        self.replay(events);
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        EventSourced::uncommitted_events(self)
    }

    fn mark_changes_as_committed(&mut self) {
        EventSourced::mark_changes_as_committed(self);
    }
}
