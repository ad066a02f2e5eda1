//! Social post demo — configuration, error types, and the scripted post
//! lifecycle driven by the `social-post-demo` binary.

pub mod config;
pub mod error;
pub mod scenario;
