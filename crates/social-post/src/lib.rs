//! Social Post — the post aggregate.
//!
//! A post is created by its author, can have its message edited and be
//! liked, collects comments that only their writers may edit or remove, and
//! ends when its author deletes it.

pub mod application;
pub mod domain;
