//! Social Event Store — event persistence behind the `EventRepository` seam.

pub mod memory_event_repository;

pub use memory_event_repository::InMemoryEventRepository;
