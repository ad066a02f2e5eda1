//! Social Core — event-sourced aggregate abstractions.
//!
//! This crate defines the aggregate-root mechanism, the event and command
//! contracts, and the event-store seam that every aggregate builds on. It
//! contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod event_sourcing;
pub mod id;
pub mod repository;
