//! Command abstractions.

use uuid::Uuid;

use crate::clock::Clock;
use crate::event::EventMetadata;
use crate::id::IdGenerator;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// The aggregate this command targets.
    fn aggregate_id(&self) -> Uuid;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

/// Ambient inputs a business operation needs besides its own arguments:
/// the correlation ID to stamp on raised events, the time source, and the
/// identifier source for new events and child entities.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Time source for event timestamps.
    pub clock: &'a dyn Clock,
    /// Identifier source for event IDs and child entity IDs.
    pub ids: &'a dyn IdGenerator,
}

impl<'a> CommandContext<'a> {
    /// Creates a new command context.
    #[must_use]
    pub fn new(correlation_id: Uuid, clock: &'a dyn Clock, ids: &'a dyn IdGenerator) -> Self {
        Self {
            correlation_id,
            clock,
            ids,
        }
    }

    /// Builds the metadata for an event raised while handling this command.
    /// The command is both the correlation and the causation of the event.
    #[must_use]
    pub fn event_metadata(
        &self,
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
    ) -> EventMetadata {
        EventMetadata {
            event_id: self.ids.next_id(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id: self.correlation_id,
            causation_id: self.correlation_id,
            occurred_at: self.clock.now(),
        }
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("correlation_id", &self.correlation_id)
            .finish_non_exhaustive()
    }
}
