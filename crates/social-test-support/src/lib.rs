//! Shared test doubles and utilities for the social post crates.

mod clock;
mod ids;
mod logging;
mod repository;

pub use clock::FixedClock;
pub use ids::SequenceIds;
pub use logging::init_tracing;
pub use repository::{
    AppendCall, EmptyEventRepository, FailingEventRepository, RecordingEventRepository,
};
