//! Application layer: command handlers that load, operate on, and save posts.

pub mod command_handlers;
