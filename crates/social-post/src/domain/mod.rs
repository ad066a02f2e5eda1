//! Domain layer: events, the `Post` aggregate, and commands.

pub mod aggregates;
pub mod commands;
pub mod events;
